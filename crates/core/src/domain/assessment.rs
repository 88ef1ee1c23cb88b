use serde::{Deserialize, Serialize};

/// Ordinal severity of one risk category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Green,
    Yellow,
    Red,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Red => "red",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one analysis pass over a ticker's snapshot and announcements.
/// Immutable once returned; every status derivation below reads only this
/// record's own fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub has_legal_risk: bool,
    pub has_regulatory_risk: bool,
    pub has_st_risk: bool,
    pub has_financing_risk: bool,
    pub has_abnormal_activity: bool,
    pub is_high_frequency: bool,

    pub pb_value: f64,
    pub pe_value: Option<f64>,
    pub market_value: Option<f64>,

    /// Delisting-watch findings bucketed by gravity, worst first.
    pub critical_risks: Vec<String>,
    pub high_risks: Vec<String>,
    pub medium_risks: Vec<String>,
    pub info_risks: Vec<String>,

    pub regulatory_count: usize,
    pub has_inquiry: bool,
    pub has_warning: bool,
    pub has_punishment: bool,
    pub has_rectification: bool,

    /// Titles of the announcements that tripped a regulatory keyword.
    pub regulatory_announcements: Vec<String>,

    /// PB level above which valuation turns red; stamped by the analyzer so
    /// the derivation stays a pure function of this record.
    pub pb_warning_threshold: f64,
}

impl Default for RiskAssessment {
    fn default() -> Self {
        Self {
            has_legal_risk: false,
            has_regulatory_risk: false,
            has_st_risk: false,
            has_financing_risk: false,
            has_abnormal_activity: false,
            is_high_frequency: false,
            pb_value: 0.0,
            pe_value: None,
            market_value: None,
            critical_risks: Vec::new(),
            high_risks: Vec::new(),
            medium_risks: Vec::new(),
            info_risks: Vec::new(),
            regulatory_count: 0,
            has_inquiry: false,
            has_warning: false,
            has_punishment: false,
            has_rectification: false,
            regulatory_announcements: Vec::new(),
            pb_warning_threshold: 8.0,
        }
    }
}

impl RiskAssessment {
    pub fn legal_status(&self) -> Severity {
        if self.has_legal_risk {
            Severity::Red
        } else if self.has_regulatory_risk {
            Severity::Yellow
        } else {
            Severity::Green
        }
    }

    pub fn regulatory_status(&self) -> Severity {
        if self.has_punishment {
            Severity::Red
        } else if self.has_inquiry
            || self.has_warning
            || self.has_rectification
            || self.regulatory_count > 0
        {
            Severity::Yellow
        } else {
            Severity::Green
        }
    }

    pub fn risk_board_status(&self) -> Severity {
        if !self.critical_risks.is_empty() || !self.high_risks.is_empty() {
            Severity::Red
        } else if !self.medium_risks.is_empty() || !self.info_risks.is_empty() {
            Severity::Yellow
        } else {
            Severity::Green
        }
    }

    pub fn frequency_status(&self) -> Severity {
        if self.is_high_frequency {
            Severity::Yellow
        } else {
            Severity::Green
        }
    }

    pub fn valuation_status(&self) -> Severity {
        if self.pb_value > self.pb_warning_threshold {
            Severity::Red
        } else {
            Severity::Green
        }
    }

    pub fn financing_status(&self) -> Severity {
        if self.has_financing_risk {
            Severity::Red
        } else {
            Severity::Green
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_is_ordinal() {
        assert!(Severity::Green < Severity::Yellow);
        assert!(Severity::Yellow < Severity::Red);
        assert_eq!(Severity::Red.as_str(), "red");
    }

    #[test]
    fn legal_status_prefers_legal_over_regulatory() {
        let mut a = RiskAssessment::default();
        assert_eq!(a.legal_status(), Severity::Green);
        a.has_regulatory_risk = true;
        assert_eq!(a.legal_status(), Severity::Yellow);
        a.has_legal_risk = true;
        assert_eq!(a.legal_status(), Severity::Red);
    }

    #[test]
    fn regulatory_status_escalates_with_punishment() {
        let mut a = RiskAssessment::default();
        assert_eq!(a.regulatory_status(), Severity::Green);
        a.regulatory_count = 2;
        assert_eq!(a.regulatory_status(), Severity::Yellow);
        a.has_inquiry = true;
        assert_eq!(a.regulatory_status(), Severity::Yellow);
        a.has_punishment = true;
        assert_eq!(a.regulatory_status(), Severity::Red);
    }

    #[test]
    fn risk_board_status_reads_bucket_gravity() {
        let mut a = RiskAssessment::default();
        assert_eq!(a.risk_board_status(), Severity::Green);
        a.info_risks.push("公告发布频繁".to_string());
        assert_eq!(a.risk_board_status(), Severity::Yellow);
        a.medium_risks.push("检出质押相关公告".to_string());
        assert_eq!(a.risk_board_status(), Severity::Yellow);
        a.high_risks.push("归母净利润同比为负".to_string());
        assert_eq!(a.risk_board_status(), Severity::Red);
    }

    #[test]
    fn valuation_status_uses_the_stamped_threshold() {
        let mut a = RiskAssessment {
            pb_value: 8.0,
            ..Default::default()
        };
        assert_eq!(a.valuation_status(), Severity::Green);
        a.pb_value = 8.01;
        assert_eq!(a.valuation_status(), Severity::Red);
        a.pb_warning_threshold = 12.0;
        assert_eq!(a.valuation_status(), Severity::Green);
    }
}
