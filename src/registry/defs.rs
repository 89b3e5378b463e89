use crate::model::registry::{
    DEFAULT_INDEX_COLUMN, DEFAULT_PERCENTILE_COLUMN, RegistryDef, Theme,
};

const CORE_COLUMNS: &[&str] = &[
    "OBJECTID",
    "ADM1_PCODE",
    "ADM1_EN",
    "ADM1_TYPE",
    "ADM2_PCODE",
    "ADM2_EN",
    "ADM2_TYPE",
    "ADM3_PCODE",
    "ADM3_EN",
    "ADM3_TYPE",
    "StudyRegio",
    "StudyReg",
    "Pop2023",
    "Pop2024",
    "geometry",
];

const INDICATORS: &[(&str, &str)] = &[
    ("CON_DFA1C", "Dahalo Flag Actor 1 (Count)"),
    ("CON_DFA2C", "Dahalo Flag Actor 2 (Count)"),
    ("CON_NDFAC1", "Non-Dahalo Flag Actor 1 (Sum)"),
    ("CON_NDFAC2", "Non-Dahalo Flag Actor 2 (Sum)"),
    ("ST_SUM", "Stunting (Sum)"),
    ("RD_DENSUNREV", "Road Density"),
    ("IPC_AVC", "IPC Average"),
    ("MK_DIST", "Distance To Market"),
    ("MK_VOLA", "Market Price Volatility"),
    ("MK_ANOM", "Anomaly Rate"),
    ("DIS_AFF", "Distance - Affected"),
    ("DIS_CROPDMG", "Crop Damage HA"),
    ("USAID_VAC", "USAID VAC"),
    ("USAID_SD", "USAID SD"),
    ("USAID_IPC", "USAID IPC"),
    ("USAID_STUNTING", "USAID STUNTING"),
    ("USAIDWEALTH", "USAID WEALTH"),
    ("USAID_PIF", "USAID PIF"),
    ("USAID_PRECIP", "USAID PRECIP"),
    ("USAID_WALKING", "USAID WALKING"),
];

// Higher road density means better access, so lower vulnerability.
const REVERSED: &[&str] = &["RD_DENSUNREV"];

/// Illustrative grouping by indicator code prefix (`CON_`, `MK_`, `DIS_`, ...)
/// and subject. The source dashboards define no themes; this grouping only
/// feeds the weight rollup in the summary and never changes the index.
const THEMES: &[(&str, &[&str])] = &[
    (
        "Conflict",
        &["CON_DFA1C", "CON_DFA2C", "CON_NDFAC1", "CON_NDFAC2"],
    ),
    ("Nutrition", &["ST_SUM", "USAID_STUNTING"]),
    ("Food Security", &["IPC_AVC", "USAID_IPC", "USAID_VAC"]),
    ("Markets", &["MK_DIST", "MK_VOLA", "MK_ANOM"]),
    ("Access", &["RD_DENSUNREV", "USAID_WALKING"]),
    ("Shocks", &["DIS_AFF", "DIS_CROPDMG", "USAID_PRECIP"]),
    ("Livelihoods", &["USAID_SD", "USAIDWEALTH", "USAID_PIF"]),
];

pub const MADAGASCAR_V3: &str = "madagascar-v3";
pub const MADAGASCAR_V3_THEMED: &str = "madagascar-v3-themed";

pub fn builtin_names() -> &'static [&'static str] {
    &[MADAGASCAR_V3, MADAGASCAR_V3_THEMED]
}

pub fn builtin_def(name: &str) -> Option<RegistryDef> {
    match name {
        MADAGASCAR_V3 => Some(madagascar_v3()),
        MADAGASCAR_V3_THEMED => Some(madagascar_v3_themed()),
        _ => None,
    }
}

/// Madagascar commune indicators, no theme grouping.
pub fn madagascar_v3() -> RegistryDef {
    RegistryDef {
        version: MADAGASCAR_V3.to_string(),
        id_column: "OBJECTID".to_string(),
        name_column: "ADM3_EN".to_string(),
        index_column: DEFAULT_INDEX_COLUMN.to_string(),
        percentile_column: DEFAULT_PERCENTILE_COLUMN.to_string(),
        core_columns: to_owned(CORE_COLUMNS),
        indicator_columns: INDICATORS.iter().map(|(c, _)| c.to_string()).collect(),
        reversed_columns: to_owned(REVERSED),
        themes: Vec::new(),
        labels: INDICATORS
            .iter()
            .map(|(c, l)| (c.to_string(), l.to_string()))
            .collect(),
    }
}

/// Same indicators as [`madagascar_v3`], grouped into the illustrative
/// [`THEMES`] for weight rollups. The index is identical to `madagascar-v3`.
pub fn madagascar_v3_themed() -> RegistryDef {
    let mut def = madagascar_v3();
    def.version = MADAGASCAR_V3_THEMED.to_string();
    def.themes = THEMES
        .iter()
        .map(|(name, members)| Theme {
            name: name.to_string(),
            indicators: to_owned(members),
        })
        .collect();
    def
}

fn to_owned(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}
