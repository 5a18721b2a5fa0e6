//! Prompt assembly for script generation and service recommendation.
//!
//! The templates are written in Japanese, addressed from the point of
//! view of a plant-control equipment vendor's sales rep. Wording
//! changes here shift what the models return, so the tests pin the
//! structural markers that downstream parsing and the sales flow rely
//! on.

pub(crate) const MIN_DURATION_MINUTES: u32 = 15;
pub(crate) const MAX_DURATION_MINUTES: u32 = 120;
pub(crate) const DEFAULT_DURATION_MINUTES: u32 = 60;

/// The counterpart's position, as the script prompt describes it.
///
/// The `to_string` and `FromStr` forms are part of the CLI and should
/// remain stable.
#[derive(
    Debug,
    Default,
    PartialEq,
    Eq,
    Clone,
    Copy,
    clap::ValueEnum,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[strum(serialize_all = "kebab-case")]
pub(crate) enum ContactRole {
    #[default]
    Staff,
    SiteManager,
    DepartmentHead,
    Executive,
}

impl ContactRole {
    /// The Japanese label used inside prompts.
    pub(crate) fn label(&self) -> &'static str {
        match self {
            ContactRole::Staff => "担当者",
            ContactRole::SiteManager => "現場責任者・課長",
            ContactRole::DepartmentHead => "部門長",
            ContactRole::Executive => "経営層・役員",
        }
    }
}

/// Everything the script prompt needs to know about one meeting.
#[derive(Debug, Clone)]
pub(crate) struct MeetingBrief {
    /// The customer company being pitched.
    pub company: String,
    /// The customer's industry or sector.
    pub industry: String,
    /// Who is sitting on the other side of the table.
    pub role: ContactRole,
    /// The customer's pain point or topic under review.
    pub pain_point: String,
    /// Scheduled meeting length. The script is sized to fill it.
    pub duration_minutes: u32,
    /// The services to pitch, in presentation order.
    pub services: Vec<String>,
}

/// Renders the full talk-script request for one meeting.
pub(crate) fn script_prompt(brief: &MeetingBrief) -> String {
    let services = brief.services.join("、");
    let minutes = brief.duration_minutes;

    format!(
        "\
あなたはプラント制御機器メーカーのベテラン営業です。
【提案先企業】{company}（{industry}、商談相手は{role}）に対して、
以下の製品・ソリューションを提案する「商談用トークスクリプト」を作成してください。
【提案するサービス】{services}
※アポ取得後の商談（対面またはオンライン）用であり、電話のアポ取りではありません。

【重要】スクリプトの深さと分量について
- 提案先企業（{company}）の財務諸表・経営指標、中期経営計画（中計）や経営方針、および{industry}業界のトレンド・課題を、あなたの知識に基づいて踏まえた「深い提案」にしてください。該当企業の情報が限られる場合は、同業種の典型的な経営課題と業界トレンドに基づいて具体的に書いてください。
- 商談時間は **{minutes}分** です。この時間内で話し切れる分量に厳密に合わせてください。{minutes}分が短い場合は各セクションを簡潔に、長い場合は具体例や数字を増やすなど、実際に商談で使える長さに調整してください。

【商談で扱う課題・ニーズ】: {pain_point}

以下の構成で書いてください。特にアイスブレイクとクロージングを必ず含めること。
各パートの分量配分も{minutes}分に合わせて明示してください（例：アイスブレイク〜3分、本論〜20分、クロージング〜5分）。

1. アイスブレイク
   - 挨拶、簡単な雑談（業界の話題や相手企業に触れつつ場を和ませる）
   - 本日の商談の目的・進め方の共有

2. 課題のヒアリング・共感
   - 相手の現状や課題の確認、共感の一言
   - （可能なら）相手企業の経営方針・中計や業界トレンドに触れつつ、課題を深掘りする問いかけ

3. 製品・ソリューションの紹介とベネフィット
   - 選択した各サービス（{services}）について、相手の課題・経営目標に対するメリットを端的に説明する
   - 財務的・経営的な効果（コスト削減、リスク低減、収益貢献など）に触れると説得力が増します

4. 懸念・質問への対応
   - 想定される質問や懸念への切り返し例

5. クロージング（必ず含めること）
   - 次回MTG（打ち合わせ）の日程を具体的にセットする流れ
   - 意思決定者の確認（「ご検討の際、他にどの方が関与されますか？」「決裁はどちらがお取りになりますか？」など、決裁者・意思決定者を確認する一言を忘れないこと）

口調は丁寧で、相手のメリットを明確に伝えるスタイルにしてください。スクリプト全体の文字量・話す分量は{minutes}分で収まるようにしてください。",
        company = brief.company,
        industry = brief.industry,
        role = brief.role.label(),
        pain_point = brief.pain_point,
    )
}

/// Renders the request for exactly eight service candidates, each with
/// a fit score the response parser can read back.
pub(crate) fn recommendation_prompt(company: &str, industry: &str, pain_point: &str) -> String {
    format!(
        "\
あなたはプラント制御機器・計装・制御ソリューションを提供するメーカーの営業です。
以下の条件から、提案できそうな製品・ソリューション・サービスを**ちょうど8つ**、具体的な名前で挙げてください。
さらに、各サービスについて「提案先企業・業界・課題との適合度」を0以上100以下の整数で付けてください。

【提案先企業】{company}
【業界・業種】{industry}
【相手の課題・検討テーマ】{pain_point}

回答は必ず次の形式のみにしてください。見出しや説明は不要です。
1. （サービス名）（適合度: 0-100の整数）
2. （サービス名）（適合度: 0-100の整数）
… 8つまで同様
例: 1. DCS更新・遠隔監視ソリューション（適合度: 92）"
    )
}
