/// Announcement-title keyword groups driving the risk flags. Kept as data so
/// the lists can be tuned or localized without touching the analyzer.
#[derive(Debug, Clone)]
pub struct RiskKeywords {
    pub legal: Vec<String>,
    pub regulatory: Vec<String>,
    pub financing: Vec<String>,
    pub abnormal: Vec<String>,

    pub inquiry: Vec<String>,
    pub warning: Vec<String>,
    pub punishment: Vec<String>,
    pub rectification: Vec<String>,

    /// Delisting-watch groups, bucketed by gravity.
    pub delisting: Vec<String>,
    pub loss_forecast: Vec<String>,
    pub overhang: Vec<String>,
}

impl Default for RiskKeywords {
    fn default() -> Self {
        Self {
            legal: to_vec(&["立案", "调查", "违法", "告知书", "处罚"]),
            regulatory: to_vec(&["监管", "问询函", "警示函", "整改"]),
            financing: to_vec(&["转融通", "出借", "融券"]),
            abnormal: to_vec(&["异动"]),
            inquiry: to_vec(&["问询函"]),
            warning: to_vec(&["警示函"]),
            punishment: to_vec(&["处罚"]),
            rectification: to_vec(&["整改"]),
            delisting: to_vec(&["退市", "终止上市"]),
            loss_forecast: to_vec(&["预亏"]),
            overhang: to_vec(&["质押", "解禁", "减持"]),
        }
    }
}

/// Case-sensitive substring scan; the keyword lists are domain-specific CJK
/// terms, so no case folding applies.
pub fn contains_any(text: &str, group: &[String]) -> bool {
    group.iter().any(|k| text.contains(k.as_str()))
}

fn to_vec(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
