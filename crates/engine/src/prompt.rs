//! Prompt construction for the excuse-generation call.
//!
//! Assembles the Japanese instruction prompt from the four request fields.
//! The `参考フォーマット` section is the wire contract the parser depends on:
//! its field labels and their order must match `parser::SCORE_LINE` exactly.
//!
//! Prompt construction never fails — missing optional fields degrade to
//! generic guidance.

use iiwake_core::ExcuseRequest;
use std::fmt::Write;

/// Per-tone stylistic guidance injected under the tone instruction.
/// Unrecognized tones get no extra bullet and rely on the generic clause.
fn tone_guidance(tone: &str) -> Option<&'static str> {
    match tone {
        "ユーモラスに" => Some(
            "  - 「ユーモラスに」の場合、クスッと笑えるような、しかし決して不真面目ではない、\
             機知に富んだり、少し間の抜けたような、微笑ましい出来事を想像してください。\
             相手を不快にさせない範囲で、軽妙な言い回しや意外な展開を試みてください。\
             この場合、**現実的な実現可能性よりも、面白さやユニークさを優先してください。**",
        ),
        "真面目に" => Some(
            "  - 「真面目に」の場合、誠実さと反省の意が伝わるように、簡潔かつ丁寧に理由を説明してください。",
        ),
        "丁寧に" => Some(
            "  - 「丁寧に」の場合、非常に丁寧な言葉遣いを心がけ、恐縮している気持ちが伝わるように表現してください。",
        ),
        "簡潔に" => Some(
            "  - 「簡潔に」の場合、要点を絞り、余分な言葉を省いて短く、しかし必要な情報は含めてください。",
        ),
        "恐縮して" => Some(
            "  - 「恐縮して」の場合、最大限の謝罪と恐縮の気持ちを表現し、相手への配慮を前面に出してください。",
        ),
        _ => None,
    }
}

/// Build the full instruction prompt for one request.
pub fn build_prompt(request: &ExcuseRequest) -> String {
    let target = &request.target;
    let delay = &request.delay_time;
    let tone_label = request.tone().unwrap_or("指定なし");
    let humorous = request.is_humorous();
    let situation = request.situation();

    let mut prompt = String::with_capacity(2048);

    let _ = write!(
        prompt,
        "# 前提条件:\n\
         - タイトル： 遅刻の言い訳を提案するプロンプト\n\
         - 依頼者条件： 遅刻をしてしまった人\n\
         - 制作者条件： 遅刻の言い訳を思いつく能力を持った人\n\
         - 目的と目標： {target}が納得するような、**物的証拠を必要とせず、口頭での説明で十分に納得させられる**遅刻の言い訳を**10個**提案する\n\
         \n\
         # 実行指示:\n\
         あなたは遅刻の言い訳を思いつく能力を持ったプロフェッショナルです。\n\
         {target}に対して、{delay}の遅刻という状況に従って、\n\
         相手が納得するような遅刻の言い訳を**10個**提案してください。\n\
         遅れた時間を最重要項目として、ステップバイステップで合理的な言い訳を具体的に考えてください。\n\
         各言い訳は、具体的な状況を盛り込み、説得力のあるものにしてください。\n\
         \n\
         **最重要指示 (優先順位順):**\n\
         1.  **もしトーンが指定されている場合（現在のトーンは「{tone_label}」です）、そのトーンを極めて厳密に守って文章全体を生成してください。特に言葉遣い、雰囲気、ユーモアの有無、感情表現などを「{tone_label}」に合わせてください。**\n"
    );

    if let Some(guidance) = request.tone().and_then(tone_guidance) {
        prompt.push_str(guidance);
        prompt.push('\n');
    }

    let mut instruction = 2;

    if request.avoid_polite_language() {
        let _ = writeln!(
            prompt,
            "{instruction}. **特に、敬語を使わず、タメ口やフランクな言葉遣いで理由を記述してください。**"
        );
        instruction += 1;
    }

    if let Some(situation) = situation {
        let _ = writeln!(
            prompt,
            "{instruction}. **提供された「具体的な状況」({situation}) を最優先事項として最大限活用し、\
             その詳細を盛り込んで説得力のある言い訳を構築してください。\
             もしこの「具体的な状況」が非日常的またはユーモラスな要素を含む場合、\
             生成する言い訳もその性質を強く反映させてください。この指示は他の指示よりも優先されます。**"
        );
        instruction += 1;
    }

    // For humorous tones the severe-event avoidance is covered by the tone
    // guidance itself.
    if !humorous {
        match situation {
            None => {
                let _ = writeln!(
                    prompt,
                    "{instruction}. **物的証拠がなくても、口頭での説明で十分に納得させられる、\
                     日常的に起こりうる範囲の理由を優先して生成してください。\
                     交通事故、救急車の出動、入院、犯罪に巻き込まれるなど極めて稀で深刻な事態や、\
                     遅延証明書が必要になるような電車の遅延（例：30分以上の遅延）は避けてください。**"
                );
            }
            Some(situation) => {
                let _ = writeln!(
                    prompt,
                    "{instruction}. **提供された「具体的な状況」({situation}) を元にしつつ、\
                     その状況とは無関係な、他の極めて稀で深刻な事態\
                     （例：依頼者が指定していない交通事故、救急車の出動、入院など）や、\
                     提供された状況と関連がない遅延証明書が必要となるような電車の遅延\
                     （例：30分以上の遅延）は避けてください。**"
                );
            }
        }
    }

    prompt.push_str("\n以下の情報も参考にしてください：\n");

    match situation {
        Some(situation) => {
            let _ = writeln!(prompt, "- 具体的な状況: {situation}");
        }
        None => {
            prompt.push_str("- 具体的な状況: （提供されていません）\n");
            let style = if humorous {
                "面白さやユニークさを追求した"
            } else {
                "物的証拠を必要とせず口頭で説明がしやすい、日常的に起こりうる範囲の"
            };
            let _ = writeln!(
                prompt,
                "「具体的な状況」が提供されていない場合は、現実的で、かつ説得力があり、\
                 **{style}**具体的な出来事を想像して言い訳を生成してください。"
            );
        }
    }

    prompt.push_str(
        "- 交通機関: 電車、バス、自家用車など（想定される一般的な交通機関を活用してください）\n\
         \n\
         次に、各言い訳に対して説得力、実現可能性、**口頭説明の容易さ**の観点から数値で評価してください。\n\
         口頭説明の容易さとは、遅延証明書や領収書などの**物的証拠がなくとも、具体的な状況描写や話し方で相手を納得させやすいか**を指します。高いほど良いです。\n",
    );

    if humorous {
        prompt.push_str(
            "ただし、トーンがユーモラスな場合は、実現可能性の評価はあまり気にせず、面白さやユニークさを重視した評価を行ってください。\n",
        );
    }

    if let Some(situation) = situation {
        if !humorous {
            let _ = writeln!(
                prompt,
                "提供された「具体的な状況」({situation}) が非日常的な場合でも、\
                 その状況を前提とした場合に、その枠組みの中での「実現可能性」を評価してください。\
                 一般的な実現可能性である必要はありません。"
            );
        }
    }

    prompt.push_str(
        "\n# 参考情報:\n\
         - 説得力: どれだけ相手に信じてもらえるか (0-100)\n\
         - 実現可能性: 実際に起こりうる可能性 (0-100)\n\
         - 口頭説明の容易さ: 物的証拠不要で、口頭説明で納得させやすいか (0-100, 高いほど良い)\n\
         \n\
         # 参考フォーマット:\n\
         [遅刻理由の本文（謝罪、具体的な理由、今後の対応まで全て含める）]\n\
         説得力: [数値], 実現可能性: [数値], 口頭説明の容易さ: [数値]\n\
         　証拠を求められたら: [証拠とその提示方法、または証拠を提示できない場合の理由と助言]\n\
         (上記フォーマットを10回繰り返す。各言い訳のブロックは空行で区切ってください)\n\
         \n\
         # 追加指示:\n\
         - 各言い訳の本文は、見出しや箇条書きなどのマークダウンを一切使用せず、平文で具体的に記述してください。\n\
         - 謝罪の言葉、具体的な遅刻理由、今後の対応（例：急いで向かいます）まで、一連の遅刻連絡として完結した文章を生成してください。**この一連の文章のトーンが、上記の「最重要指示」で指定されたトーンと完全に一致するようにしてください。**\n\
         - 嘘や不確かな情報は含めないでください。\n\
         - 同じような言い訳は避けてください。\n\
         - 余計な前置き、結論やまとめは書かないでください。\n\
         - 指示の復唱はしないでください。\n\
         - 自己評価はしないでください。\n\
         - **各言い訳の前に番号（例: 1., 2. など）を絶対につけないでください。**\n\
         - 参考フォーマットを厳密に守り、**10個**の言い訳を提案してください。\n",
    );

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(
        target: &str,
        situation: Option<&str>,
        tone: Option<&str>,
    ) -> ExcuseRequest {
        ExcuseRequest {
            delay_time: "15分".into(),
            target: target.into(),
            situation: situation.map(String::from),
            tone: tone.map(String::from),
        }
    }

    #[test]
    fn prompt_embeds_target_and_delay() {
        let prompt = build_prompt(&request("上司", None, None));
        assert!(prompt.contains("上司"));
        assert!(prompt.contains("15分"));
        assert!(prompt.contains("10個"));
    }

    #[test]
    fn format_contract_is_present() {
        let prompt = build_prompt(&request("上司", None, None));
        assert!(prompt.contains("説得力: [数値], 実現可能性: [数値], 口頭説明の容易さ: [数値]"));
        assert!(prompt.contains("証拠を求められたら:"));
    }

    #[test]
    fn unrecognized_tone_gets_generic_guidance() {
        let prompt = build_prompt(&request("上司", None, Some("演歌調で")));
        assert!(prompt.contains("演歌調で"));
        // No per-tone bullet fires.
        assert!(!prompt.contains("「ユーモラスに」の場合"));
        assert!(!prompt.contains("「真面目に」の場合"));
    }

    #[test]
    fn humorous_casual_requests_frank_register() {
        let prompt = build_prompt(&request("友人", None, Some("ユーモラスに")));
        assert!(prompt.contains("タメ口やフランクな言葉遣い"));
        // The everyday-plausibility constraint is omitted for humorous tone.
        assert!(!prompt.contains("日常的に起こりうる範囲の理由を優先して"));
    }

    #[test]
    fn humorous_to_boss_keeps_polite_register() {
        let prompt = build_prompt(&request("上司", None, Some("ユーモラスに")));
        assert!(!prompt.contains("タメ口やフランクな言葉遣い"));
    }

    #[test]
    fn serious_without_situation_prefers_everyday_causes() {
        let prompt = build_prompt(&request("上司", None, Some("真面目に")));
        assert!(prompt.contains("日常的に起こりうる範囲の理由を優先して"));
        assert!(prompt.contains("遅延証明書"));
    }

    #[test]
    fn situation_dominates_and_excludes_unrelated_severe_events() {
        let prompt = build_prompt(&request("上司", Some("猫が逃げた"), Some("真面目に")));
        assert!(prompt.contains("猫が逃げた"));
        assert!(prompt.contains("最優先事項として最大限活用"));
        assert!(prompt.contains("その状況とは無関係な"));
        // The no-situation fallback must not appear.
        assert!(!prompt.contains("（提供されていません）"));
    }

    #[test]
    fn never_fails_on_empty_optionals() {
        let prompt = build_prompt(&request("友人", Some(""), Some("   ")));
        assert!(prompt.contains("指定なし"));
        assert!(prompt.contains("（提供されていません）"));
    }
}
