pub mod keywords;

use crate::config::Settings;
use crate::domain::assessment::RiskAssessment;
use crate::ingest::types::{Announcement, Snapshot};
use self::keywords::{contains_any, RiskKeywords};

/// Rule-based assessor over one ticker's snapshot and announcement page.
/// `analyze` does no I/O and reads no ambient state; identical inputs yield
/// identical assessments.
#[derive(Debug, Clone)]
pub struct RiskAnalyzer {
    keywords: RiskKeywords,
    pb_warning_threshold: f64,
    high_frequency_threshold: usize,
}

impl Default for RiskAnalyzer {
    fn default() -> Self {
        Self {
            keywords: RiskKeywords::default(),
            pb_warning_threshold: 8.0,
            high_frequency_threshold: 40,
        }
    }
}

impl RiskAnalyzer {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            keywords: RiskKeywords::default(),
            pb_warning_threshold: settings.pb_warning_threshold,
            high_frequency_threshold: settings.high_frequency_threshold,
        }
    }

    pub fn with_keywords(mut self, keywords: RiskKeywords) -> Self {
        self.keywords = keywords;
        self
    }

    pub fn analyze(&self, snap: &Snapshot, anns: &[Announcement]) -> RiskAssessment {
        let ann_text: String = anns.iter().map(|a| a.title.as_str()).collect();

        let mut out = RiskAssessment {
            pb_warning_threshold: self.pb_warning_threshold,
            ..Default::default()
        };

        out.has_legal_risk = contains_any(&ann_text, &self.keywords.legal);
        out.has_regulatory_risk = contains_any(&ann_text, &self.keywords.regulatory);
        out.has_financing_risk = contains_any(&ann_text, &self.keywords.financing);
        out.has_abnormal_activity = contains_any(&ann_text, &self.keywords.abnormal);
        out.is_high_frequency = anns.len() > self.high_frequency_threshold;

        // The vendor publishes PB scaled by 100; absence reads as 0, not null.
        out.pb_value = snap.num_field("f167").unwrap_or(0.0) / 100.0;
        out.pe_value = snap.num_field("f43");
        out.market_value = snap.num_field("f116");

        let name = snap.text_field("f58");
        let negative_profit = snap.num_field("f114").map_or(false, |v| v < 0.0);
        out.has_st_risk = name.contains("ST") || negative_profit;

        self.scan_regulatory(&mut out, anns);
        self.bucket_findings(&mut out, &name, negative_profit, &ann_text);

        out
    }

    fn scan_regulatory(&self, out: &mut RiskAssessment, anns: &[Announcement]) {
        for ann in anns {
            let title = ann.title.as_str();
            if contains_any(title, &self.keywords.inquiry) {
                out.has_inquiry = true;
            }
            if contains_any(title, &self.keywords.warning) {
                out.has_warning = true;
            }
            if contains_any(title, &self.keywords.punishment) {
                out.has_punishment = true;
            }
            if contains_any(title, &self.keywords.rectification) {
                out.has_rectification = true;
            }
            if contains_any(title, &self.keywords.regulatory) {
                out.regulatory_count += 1;
                out.regulatory_announcements.push(ann.title.clone());
            }
        }
    }

    fn bucket_findings(
        &self,
        out: &mut RiskAssessment,
        name: &str,
        negative_profit: bool,
        ann_text: &str,
    ) {
        if name.contains("*ST") {
            out.critical_risks.push("名称带 *ST 退市风险警示".to_string());
        } else if name.contains("ST") {
            out.critical_risks.push("名称带 ST 其他风险警示".to_string());
        }
        if contains_any(ann_text, &self.keywords.delisting) {
            out.critical_risks.push("公告提及退市事项".to_string());
        }

        if negative_profit {
            out.high_risks.push("归母净利润同比为负".to_string());
        }
        if contains_any(ann_text, &self.keywords.loss_forecast) {
            out.high_risks.push("公告提及业绩预亏".to_string());
        }

        for k in &self.keywords.overhang {
            if ann_text.contains(k.as_str()) {
                out.medium_risks.push(format!("公告提及{k}"));
            }
        }

        if out.has_abnormal_activity {
            out.info_risks.push("触发股价异动自查".to_string());
        }
        if out.is_high_frequency {
            out.info_risks.push("公告发布密度偏高".to_string());
        }
    }
}
