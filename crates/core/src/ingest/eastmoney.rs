use crate::config::Settings;
use crate::ingest::provider::MarketDataProvider;
use crate::ingest::types::{
    value_num, value_str, Announcement, CompanyProfile, ExtraDetails, FinancialPeriodRecord,
    HolderRecord, Snapshot, SymbolRecord,
};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::Value;

const DESKTOP_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
const F10_REFERER: &str = "https://emweb.securities.eastmoney.com/";

/// Maximum reporting periods kept from the financial-indicator endpoint.
const FINA_PERIODS: usize = 6;

/// Eastmoney public-endpoint client. One attempt per call, no retries; a
/// failed call degrades to an empty value for that data product only.
#[derive(Debug, Clone)]
pub struct EastmoneyClient {
    http: reqwest::Client,
    settings: Settings,
}

/// Shanghai codes lead with '6'; everything else trades in Shenzhen. Every
/// endpoint URL hangs off this rule.
pub fn secid(code: &str) -> String {
    if code.starts_with('6') {
        format!("1.{code}")
    } else {
        format!("0.{code}")
    }
}

pub fn em_code(code: &str) -> String {
    if code.starts_with('6') {
        format!("SH{code}")
    } else {
        format!("SZ{code}")
    }
}

pub fn secucode(code: &str) -> String {
    if code.starts_with('6') {
        format!("{code}.SH")
    } else {
        format!("{code}.SZ")
    }
}

impl EastmoneyClient {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(settings.request_timeout())
            .build()
            .context("failed to build eastmoney http client")?;

        Ok(Self {
            http,
            settings: settings.clone(),
        })
    }

    pub async fn fetch_symbol_index(&self) -> Result<Vec<SymbolRecord>> {
        let url = format!(
            "{}?pn=1&pz=6000&po=1&np=1&fields=f12,f14,f100&fs=m:0+t:6,m:0+t:80,m:1+t:2,m:1+t:23",
            self.settings.stock_list_url
        );

        let res = self
            .http
            .get(&url)
            .send()
            .await
            .context("stock list request failed")?;
        let status = res.status();
        anyhow::ensure!(status.is_success(), "stock list HTTP {status}");

        let body = res
            .json::<Value>()
            .await
            .context("stock list response is not valid JSON")?;
        Ok(decode_symbol_rows(&body))
    }

    pub async fn fetch_risk_data(
        &self,
        code: &str,
    ) -> (Option<Snapshot>, Option<Vec<Announcement>>) {
        let snap_url = format!(
            "{}?secid={}&fields=f58,f43,f170,f167,f116,f127,f186,f114,f115,f117",
            self.settings.stock_detail_url,
            secid(code)
        );
        let ann_url = format!(
            "{}?sr=-1&page_size={}&page_index=1&stock_list={}",
            self.settings.announcement_url, self.settings.announcement_limit, code
        );

        let (snap_body, ann_body) = tokio::join!(
            self.get_json(&snap_url, HeaderMap::new()),
            self.get_json(&ann_url, HeaderMap::new()),
        );

        let snap = snap_body
            .map(|v| Snapshot::from_value(v.get("data").cloned().unwrap_or(Value::Null)));
        let anns = ann_body.map(|v| decode_announcements(&v));
        (snap, anns)
    }

    pub async fn fetch_extra_details(&self, code: &str) -> ExtraDetails {
        let em = em_code(code);
        let company_url = format!(
            "{}/CompanySurvey/PageAjax?code={}",
            self.settings.f10_base_url, em
        );
        let holders_url = format!(
            "{}/ShareholderResearch/PageAjax?code={}",
            self.settings.f10_base_url, em
        );
        let fina_url = format!(
            "{}/securities/api/data/get?type=RPT_F10_FINANCE_MAINFINADATA&sty=APP_F10_MAINFINADATA&quoteColumns=&filter=(SECUCODE=\"{}\")&p=1&ps={}&sr=-1&st=REPORT_DATE",
            self.settings.datacenter_base_url,
            secucode(code),
            FINA_PERIODS
        );

        let (company_body, holders_body, fina_body) = tokio::join!(
            self.get_json(&company_url, anti_scrape_headers()),
            self.get_json(&holders_url, anti_scrape_headers()),
            self.get_json(&fina_url, anti_scrape_headers()),
        );

        let mut out = ExtraDetails::default();
        if let Some(v) = company_body {
            out.company = decode_company(&v);
        }
        if let Some(v) = holders_body {
            out.holders = decode_holders(v.get("sdgd"));
            out.float_holders = decode_holders(v.get("sdltgd"));
        }
        if let Some(v) = fina_body {
            out.fina = decode_fina(&v);
        }
        out
    }

    /// One attempt, no retries. Transport failures (connect, timeout, body
    /// read) map to `None`; a reachable endpoint answering badly (non-2xx,
    /// undecodable body) maps to `Some(Value::Null)` so sibling calls keep
    /// their own results.
    async fn get_json(&self, url: &str, headers: HeaderMap) -> Option<Value> {
        let res = match self.http.get(url).headers(headers).send().await {
            Ok(r) => r,
            Err(err) => {
                tracing::warn!(error = %err, url, "vendor request failed");
                return None;
            }
        };

        let status = res.status();
        let text = match res.text().await {
            Ok(t) => t,
            Err(err) => {
                tracing::warn!(error = %err, url, "failed to read vendor response");
                return None;
            }
        };

        if !status.is_success() {
            tracing::warn!(http_status = %status, url, "vendor HTTP error");
            return Some(Value::Null);
        }

        match serde_json::from_str::<Value>(&text) {
            Ok(v) => Some(v),
            Err(err) => {
                tracing::warn!(error = %err, url, "vendor response is not valid JSON");
                Some(Value::Null)
            }
        }
    }
}

#[async_trait::async_trait]
impl MarketDataProvider for EastmoneyClient {
    fn provider_name(&self) -> &'static str {
        "eastmoney"
    }

    async fn fetch_symbol_index(&self) -> Result<Vec<SymbolRecord>> {
        EastmoneyClient::fetch_symbol_index(self).await
    }

    async fn fetch_risk_data(
        &self,
        code: &str,
    ) -> (Option<Snapshot>, Option<Vec<Announcement>>) {
        EastmoneyClient::fetch_risk_data(self, code).await
    }

    async fn fetch_extra_details(&self, code: &str) -> ExtraDetails {
        EastmoneyClient::fetch_extra_details(self, code).await
    }
}

fn anti_scrape_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("User-Agent", HeaderValue::from_static(DESKTOP_USER_AGENT));
    headers.insert("Referer", HeaderValue::from_static(F10_REFERER));
    headers
}

/// The listing payload has shipped in two shapes: `data.diff` as an array of
/// rows, and as an object map keyed by row position. Named fields
/// (f12/f14/f100) win; rows without them fall back to their first three
/// values as symbol/name/industry.
pub(crate) fn decode_symbol_rows(body: &Value) -> Vec<SymbolRecord> {
    let rows: Vec<&Value> = match body.pointer("/data/diff") {
        Some(Value::Array(items)) => items.iter().collect(),
        Some(Value::Object(map)) => map.values().collect(),
        _ => Vec::new(),
    };

    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        if let Some(rec) = decode_symbol_row(row) {
            out.push(rec);
        }
    }
    out
}

fn decode_symbol_row(row: &Value) -> Option<SymbolRecord> {
    if let Some(obj) = row.as_object() {
        if obj.contains_key("f12") || obj.contains_key("f14") {
            let symbol = value_str(row, "f12");
            if symbol.is_empty() {
                return None;
            }
            let name = value_str(row, "f14");
            return Some(SymbolRecord::new(&symbol, &name, &value_str(row, "f100")));
        }

        let mut vals = obj.values().map(scalar_text);
        let symbol = vals.next().unwrap_or_default();
        let name = vals.next().unwrap_or_default();
        let industry = vals.next().unwrap_or_default();
        if symbol.is_empty() {
            return None;
        }
        return Some(SymbolRecord::new(&symbol, &name, &industry));
    }

    if let Some(items) = row.as_array() {
        let symbol = items.first().map(scalar_text).unwrap_or_default();
        let name = items.get(1).map(scalar_text).unwrap_or_default();
        let industry = items.get(2).map(scalar_text).unwrap_or_default();
        if symbol.is_empty() {
            return None;
        }
        return Some(SymbolRecord::new(&symbol, &name, &industry));
    }

    None
}

fn scalar_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

pub(crate) fn decode_announcements(body: &Value) -> Vec<Announcement> {
    let items = match body.pointer("/data/list") {
        Some(Value::Array(items)) => items,
        _ => return Vec::new(),
    };

    items
        .iter()
        .filter_map(|item| {
            item.as_object()?;
            let columns = match item.get("columns") {
                Some(Value::Array(cols)) => cols
                    .iter()
                    .map(|c| value_str(c, "column_name"))
                    .filter(|s| !s.is_empty())
                    .collect(),
                _ => Vec::new(),
            };
            Some(Announcement {
                title: value_str(item, "title"),
                art_code: value_str(item, "art_code"),
                notice_date: parse_notice_date(&value_str(item, "notice_date")),
                columns,
            })
        })
        .collect()
}

fn parse_notice_date(s: &str) -> Option<NaiveDate> {
    // Vendor format: "YYYY-MM-DD HH:MM:SS"; the date part is enough.
    let date_part = s.trim().get(..10)?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

fn decode_company(body: &Value) -> Option<CompanyProfile> {
    let jbzl = body.pointer("/jbzl/0")?;
    let obj = jbzl.as_object()?;
    if obj.is_empty() {
        return None;
    }

    Some(CompanyProfile {
        reg_name: str_or(jbzl, "ORG_NAME", "SECURITY_NAME_ABBR"),
        chairman: str_or(jbzl, "CHAIRMAN", "LEGAL_PERSON"),
        main_business: value_str(jbzl, "BUSINESS_SCOPE"),
        introduction: value_str(jbzl, "ORG_PROFILE"),
        province: value_str(jbzl, "PROVINCE"),
        city: value_str(jbzl, "ADDRESS"),
    })
}

fn str_or(v: &Value, primary: &str, fallback: &str) -> String {
    let s = value_str(v, primary);
    if s.is_empty() {
        value_str(v, fallback)
    } else {
        s
    }
}

fn decode_holders(v: Option<&Value>) -> Option<Vec<HolderRecord>> {
    let items = v?.as_array()?;
    let list: Vec<HolderRecord> = items
        .iter()
        .filter_map(|item| {
            item.as_object()?;
            Some(HolderRecord {
                holder_name: value_str(item, "HOLDER_NAME"),
                hold_ratio: item.get("HOLD_NUM_RATIO").and_then(value_num),
                hold_amount: item.get("HOLD_NUM").and_then(value_num),
            })
        })
        .collect();

    if list.is_empty() {
        None
    } else {
        Some(list)
    }
}

fn decode_fina(body: &Value) -> Option<Vec<FinancialPeriodRecord>> {
    let items = body.pointer("/result/data")?.as_array()?;
    let list: Vec<FinancialPeriodRecord> = items
        .iter()
        .take(FINA_PERIODS)
        .filter_map(|item| {
            item.as_object()?;
            Some(FinancialPeriodRecord {
                end_date: value_str(item, "REPORT_DATE_NAME"),
                roe: item.get("ROEJQ").and_then(value_num),
                netprofit_yoy: item.get("PARENTNETPROFITTZ").and_then(value_num),
                business_income_yoy: item.get("TOTALOPERATEREVETZ").and_then(value_num),
                basic_eps: item.get("EPSJB").and_then(value_num),
                total_oper_rev: item.get("TOTALOPERATEREVE").and_then(value_num),
                net_profit: item.get("PARENTNETPROFIT").and_then(value_num),
            })
        })
        .collect();

    if list.is_empty() {
        None
    } else {
        Some(list)
    }
}
