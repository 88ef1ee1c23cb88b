use crate::ingest::types::HolderRecord;
use regex::Regex;
use std::sync::LazyLock;

/// Connector tokens that introduce a counterparty in a business description.
const PARTNER_CONNECTORS: &[&str] = &["与", "和", "及"];

/// Verbs that mark the relationship as cooperative.
const PARTNER_VERBS: &[&str] = &["合作", "参股", "共同", "投资"];

/// Corporate-suffix markers separating institutions from natural persons.
const INSTITUTION_MARKERS: &[&str] = &["有限", "公司", "基金", "证券", "资产"];

static PARTNER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    let connectors = PARTNER_CONNECTORS.join("|");
    let verbs = PARTNER_VERBS.join("|");
    // Counterparty: 2-40 chars between a connector and a cooperation verb,
    // stopping at CJK clause punctuation.
    Regex::new(&format!("({connectors})([^，。；]{{2,40}})({verbs})"))
        .expect("partner pattern must compile")
});

/// Candidate partner names mined from free-text company descriptions, in
/// match order, duplicates kept. Empty and the literal "None" (a stringified
/// null leaking out of loosely-typed payloads) yield nothing.
pub fn extract_partners(text: &str) -> Vec<String> {
    let t = text.trim();
    if t.is_empty() || t == "None" {
        return Vec::new();
    }

    PARTNER_PATTERN
        .captures_iter(t)
        .map(|c| c[2].trim().to_string())
        .collect()
}

/// Holder records whose name carries a corporate suffix.
pub fn institutional_holders(holders: &[HolderRecord]) -> Vec<HolderRecord> {
    holders
        .iter()
        .filter(|h| {
            INSTITUTION_MARKERS
                .iter()
                .any(|k| h.holder_name.contains(k))
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn holder(name: &str) -> HolderRecord {
        HolderRecord {
            holder_name: name.to_string(),
            hold_ratio: None,
            hold_amount: None,
        }
    }

    #[test]
    fn extracts_partner_between_connector_and_verb() {
        assert_eq!(
            extract_partners("公司与阿里巴巴合作开发产品"),
            vec!["阿里巴巴".to_string()]
        );
    }

    #[test]
    fn preserves_match_order_across_clauses() {
        let text = "公司与阿里巴巴合作开发产品，并和腾讯共同设立合资企业";
        assert_eq!(
            extract_partners(text),
            vec!["阿里巴巴".to_string(), "腾讯".to_string()]
        );
    }

    #[test]
    fn clause_punctuation_bounds_the_capture() {
        // The counterparty cannot span a full-width comma.
        assert!(extract_partners("公司与，合作").is_empty());
    }

    #[test]
    fn single_char_counterparty_is_too_short() {
        assert!(extract_partners("与A合作").is_empty());
    }

    #[test]
    fn empty_and_stringified_none_yield_nothing() {
        assert!(extract_partners("").is_empty());
        assert!(extract_partners("   ").is_empty());
        assert!(extract_partners("None").is_empty());
    }

    #[test]
    fn institutional_filter_keeps_corporate_suffixes_only() {
        let holders = vec![holder("张三"), holder("某某基金管理有限公司")];
        let inst = institutional_holders(&holders);
        assert_eq!(inst.len(), 1);
        assert_eq!(inst[0].holder_name, "某某基金管理有限公司");
    }

    #[test]
    fn empty_holder_list_yields_empty() {
        assert!(institutional_holders(&[]).is_empty());
    }
}
