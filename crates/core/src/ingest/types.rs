use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// One row of the tradable-symbol universe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolRecord {
    pub symbol: String,
    pub name: String,
    pub industry: String,

    /// Lower-cased "symbol name", precomputed for substring search.
    pub search_key: String,
}

impl SymbolRecord {
    pub fn new(symbol: &str, name: &str, industry: &str) -> Self {
        let symbol = symbol.trim().to_string();
        let name = name.trim().to_string();
        let search_key = format!("{} {}", symbol.to_lowercase(), name.to_lowercase());
        Self {
            symbol,
            name,
            industry: industry.trim().to_string(),
            search_key,
        }
    }
}

/// Latest valuation/fundamental figures for one ticker, keyed by vendor
/// field code (f58, f167, ...). The vendor omits fields freely, so every
/// accessor tolerates absence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    fields: BTreeMap<String, Value>,
}

impl Snapshot {
    /// Non-object payloads (including null from a degraded fetch) become an
    /// empty snapshot.
    pub fn from_value(v: Value) -> Self {
        match v {
            Value::Object(map) => Self {
                fields: map.into_iter().collect(),
            },
            _ => Self::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn str_field(&self, key: &str) -> Option<&str> {
        match self.fields.get(key) {
            Some(Value::String(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// String view of a field; missing, null and non-text values render as "".
    pub fn text_field(&self, key: &str) -> String {
        match self.fields.get(key) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        }
    }

    /// Numeric view of a field; accepts numbers and numeric strings.
    pub fn num_field(&self, key: &str) -> Option<f64> {
        value_num(self.fields.get(key)?)
    }
}

/// One disclosure item from the vendor's announcement feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
    pub title: String,
    #[serde(default)]
    pub art_code: String,
    #[serde(default)]
    pub notice_date: Option<NaiveDate>,
    #[serde(default)]
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub reg_name: String,
    pub chairman: String,
    pub main_business: String,
    pub introduction: String,
    pub province: String,
    pub city: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HolderRecord {
    pub holder_name: String,
    pub hold_ratio: Option<f64>,
    pub hold_amount: Option<f64>,
}

/// One reporting period of the main financial indicators.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialPeriodRecord {
    pub end_date: String,
    pub roe: Option<f64>,
    pub netprofit_yoy: Option<f64>,
    pub business_income_yoy: Option<f64>,
    pub basic_eps: Option<f64>,
    pub total_oper_rev: Option<f64>,
    pub net_profit: Option<f64>,
}

/// Secondary per-ticker data. Each member comes from its own endpoint and
/// is None when that endpoint failed; siblings stay populated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtraDetails {
    pub company: Option<CompanyProfile>,
    pub holders: Option<Vec<HolderRecord>>,
    pub float_holders: Option<Vec<HolderRecord>>,
    pub fina: Option<Vec<FinancialPeriodRecord>>,
}

pub fn parse_num(s: &str) -> Option<f64> {
    let t = s.trim();
    if t.is_empty() {
        return None;
    }
    t.parse::<f64>().ok()
}

pub fn value_num(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_num(s),
        _ => None,
    }
}

/// String field with "" default, tolerating numeric values.
pub fn value_str(v: &Value, key: &str) -> String {
    match v.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}
