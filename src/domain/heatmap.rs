//! Rate-book heatmap aggregation.
//!
//! An exploratory grid over the live rate book: rows are vehicles or
//! make/model groups, columns are providers or contract types, cells carry
//! min/max/count price statistics. Independent of the classification pass;
//! the scoring engine is only consulted for the minimum-score filter.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::money::Pence;
use super::normalize::{normalize_manufacturer, normalize_model, same_manufacturer};
use super::rate::{ContractType, RateRecord};
use super::score::Scorer;

/// Bounds on how many rows one grid may carry.
pub const MIN_ROW_LIMIT: usize = 20;
pub const MAX_ROW_LIMIT: usize = 200;
pub const DEFAULT_ROW_LIMIT: usize = 50;

/// Row dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RowMode {
    /// One row per CAP-coded derivative.
    PerVehicle,
    /// One row per manufacturer/model group.
    PerMakeModel,
}

/// Column dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColumnMode {
    Providers,
    ContractTypes,
}

/// Which statistic the cell `value` carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Metric {
    BestPrice,
    PriceRange,
    RateCount,
}

impl Metric {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BestPrice => "best-price",
            Self::PriceRange => "price-range",
            Self::RateCount => "rate-count",
        }
    }
}

impl std::str::FromStr for RowMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "per-vehicle" => Ok(Self::PerVehicle),
            "per-make-model" => Ok(Self::PerMakeModel),
            other => Err(format!("unknown row mode: {other}")),
        }
    }
}

impl std::str::FromStr for ColumnMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "providers" => Ok(Self::Providers),
            "contract-types" => Ok(Self::ContractTypes),
            other => Err(format!("unknown column mode: {other}")),
        }
    }
}

impl std::str::FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "best-price" => Ok(Self::BestPrice),
            "price-range" => Ok(Self::PriceRange),
            "rate-count" => Ok(Self::RateCount),
            other => Err(format!("unknown metric: {other}")),
        }
    }
}

/// Row selection predicate.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HeatmapFilter {
    /// Contract types to include; empty means all.
    #[serde(default)]
    pub contract_types: Vec<ContractType>,
    /// Free-text search over manufacturer, model, variant and CAP code.
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub manufacturers: Vec<String>,
    #[serde(default)]
    pub providers: Vec<String>,
    #[serde(default)]
    pub fuel_types: Vec<String>,
    #[serde(default)]
    pub body_styles: Vec<String>,
    /// Inclusive monthly price bounds, pence.
    #[serde(default)]
    pub min_price: Option<Pence>,
    #[serde(default)]
    pub max_price: Option<Pence>,
    #[serde(default)]
    pub min_score: Option<u8>,
    /// Requested row cap; clamped to [MIN_ROW_LIMIT, MAX_ROW_LIMIT].
    #[serde(default)]
    pub row_limit: Option<usize>,
}

impl HeatmapFilter {
    fn effective_row_limit(&self) -> usize {
        self.row_limit
            .unwrap_or(DEFAULT_ROW_LIMIT)
            .clamp(MIN_ROW_LIMIT, MAX_ROW_LIMIT)
    }

    fn accepts(&self, rate: &RateRecord, scorer: &Scorer) -> bool {
        if !rate.snapshot_is_latest {
            return false;
        }
        if !self.contract_types.is_empty() && !self.contract_types.contains(&rate.contract_type)
        {
            return false;
        }
        if !self.manufacturers.is_empty()
            && !self
                .manufacturers
                .iter()
                .any(|m| same_manufacturer(m, &rate.manufacturer))
        {
            return false;
        }
        if !self.providers.is_empty()
            && !self
                .providers
                .iter()
                .any(|p| p.eq_ignore_ascii_case(rate.provider.as_str()))
        {
            return false;
        }
        if !self.fuel_types.is_empty() {
            let Some(fuel) = rate.fuel_type.as_deref() else {
                return false;
            };
            if !self.fuel_types.iter().any(|f| f.eq_ignore_ascii_case(fuel)) {
                return false;
            }
        }
        if !self.body_styles.is_empty() {
            let Some(body) = rate.body_style.as_deref() else {
                return false;
            };
            if !self.body_styles.iter().any(|b| b.eq_ignore_ascii_case(body)) {
                return false;
            }
        }
        if let Some(min) = self.min_price {
            if rate.total_rental < min {
                return false;
            }
        }
        if let Some(max) = self.max_price {
            if rate.total_rental > max {
                return false;
            }
        }
        if let Some(needle) = self.search.as_deref() {
            let needle = needle.to_lowercase();
            let haystack = format!(
                "{} {} {} {}",
                rate.manufacturer, rate.model, rate.variant, rate.cap_code
            )
            .to_lowercase();
            if !haystack.contains(&needle) {
                return false;
            }
        }
        if let Some(min_score) = self.min_score {
            if scorer.score_rate(rate).score < min_score {
                return false;
            }
        }
        true
    }
}

/// A full grid request: predicate plus the two dimensions and the metric.
#[derive(Debug, Clone, Deserialize)]
pub struct HeatmapRequest {
    #[serde(default)]
    pub filter: HeatmapFilter,
    pub rows: RowMode,
    pub columns: ColumnMode,
    pub metric: Metric,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapRow {
    pub id: String,
    pub label: String,
    pub sub_label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapColumn {
    pub id: String,
    pub label: String,
}

/// One (row, column) cell. `min`/`max` are absent when no rate falls in the
/// cell.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapCell {
    pub row_id: String,
    pub column_id: String,
    /// The selected metric's value for this cell.
    pub value: i64,
    pub min: Option<Pence>,
    pub max: Option<Pence>,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapResult {
    pub rows: Vec<HeatmapRow>,
    pub columns: Vec<HeatmapColumn>,
    pub cells: Vec<HeatmapCell>,
    pub metric: Metric,
}

impl HeatmapResult {
    fn empty(metric: Metric) -> Self {
        Self {
            rows: Vec::new(),
            columns: Vec::new(),
            cells: Vec::new(),
            metric,
        }
    }
}

fn row_key(rate: &RateRecord, mode: RowMode) -> HeatmapRow {
    match mode {
        RowMode::PerVehicle => HeatmapRow {
            id: rate.cap_code.to_string(),
            label: format!("{} {}", rate.manufacturer, rate.model),
            sub_label: Some(rate.variant.clone()),
        },
        RowMode::PerMakeModel => HeatmapRow {
            id: format!(
                "{}|{}",
                normalize_manufacturer(&rate.manufacturer),
                normalize_model(&rate.model)
            ),
            label: format!("{} {}", rate.manufacturer, rate.model),
            sub_label: None,
        },
    }
}

fn column_key(rate: &RateRecord, mode: ColumnMode) -> HeatmapColumn {
    match mode {
        ColumnMode::Providers => HeatmapColumn {
            id: rate.provider.to_string(),
            label: rate.provider.to_string(),
        },
        ColumnMode::ContractTypes => HeatmapColumn {
            id: rate.contract_type.as_str().to_string(),
            label: rate.contract_type.as_str().to_string(),
        },
    }
}

/// Build a comparison grid over the rate book.
///
/// Zero matching rows is a valid outcome and yields an empty grid.
pub fn build_heatmap(
    rates: &[RateRecord],
    request: &HeatmapRequest,
    scorer: &Scorer,
) -> HeatmapResult {
    let selected: Vec<&RateRecord> = rates
        .iter()
        .filter(|r| request.filter.accepts(r, scorer))
        .collect();

    if selected.is_empty() {
        return HeatmapResult::empty(request.metric);
    }

    // Distinct rows, ordered by label then id so the cap truncates
    // deterministically.
    let mut rows: Vec<HeatmapRow> = Vec::new();
    for rate in &selected {
        let row = row_key(rate, request.rows);
        if !rows.iter().any(|r| r.id == row.id) {
            rows.push(row);
        }
    }
    rows.sort_by(|a, b| a.label.cmp(&b.label).then_with(|| a.id.cmp(&b.id)));
    rows.truncate(request.filter.effective_row_limit());

    let row_ids: BTreeSet<&str> = rows.iter().map(|r| r.id.as_str()).collect();
    let in_grid: Vec<&RateRecord> = selected
        .iter()
        .copied()
        .filter(|r| row_ids.contains(row_key(r, request.rows).id.as_str()))
        .collect();

    // Distinct columns present among the capped rows.
    let mut columns: Vec<HeatmapColumn> = Vec::new();
    for rate in &in_grid {
        let column = column_key(rate, request.columns);
        if !columns.iter().any(|c| c.id == column.id) {
            columns.push(column);
        }
    }
    columns.sort_by(|a, b| a.id.cmp(&b.id));

    let mut cells = Vec::with_capacity(rows.len() * columns.len());
    for row in &rows {
        for column in &columns {
            let mut min: Option<Pence> = None;
            let mut max: Option<Pence> = None;
            let mut count = 0usize;
            for rate in &in_grid {
                if row_key(rate, request.rows).id != row.id
                    || column_key(rate, request.columns).id != column.id
                {
                    continue;
                }
                count += 1;
                min = Some(min.map_or(rate.total_rental, |m| m.min(rate.total_rental)));
                max = Some(max.map_or(rate.total_rental, |m| m.max(rate.total_rental)));
            }

            let value = match request.metric {
                Metric::BestPrice => min.unwrap_or(0),
                Metric::PriceRange => match (min, max) {
                    (Some(lo), Some(hi)) => hi - lo,
                    _ => 0,
                },
                Metric::RateCount => count as i64,
            };
            cells.push(HeatmapCell {
                row_id: row.id.clone(),
                column_id: column.id.clone(),
                value,
                min,
                max,
                count,
            });
        }
    }

    HeatmapResult {
        rows,
        columns,
        cells,
        metric: request.metric,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ids::{CapCode, ProviderCode};

    fn rate(
        cap: &str,
        manufacturer: &str,
        model: &str,
        provider: &str,
        contract: ContractType,
        price: Pence,
    ) -> RateRecord {
        RateRecord {
            cap_code: CapCode::new(cap),
            manufacturer: manufacturer.to_string(),
            model: model.to_string(),
            variant: format!("{model} trim"),
            provider: ProviderCode::new(provider),
            contract_type: contract,
            term_months: 36,
            annual_mileage: 10_000,
            total_rental: price,
            vehicle_value: 3_000_000,
            co2_gkm: 120,
            bik_percent: None,
            cached_score: Some(75),
            fuel_type: Some("Petrol".to_string()),
            body_style: Some("Saloon".to_string()),
            snapshot_is_latest: true,
        }
    }

    fn request(rows: RowMode, columns: ColumnMode, metric: Metric) -> HeatmapRequest {
        HeatmapRequest {
            filter: HeatmapFilter::default(),
            rows,
            columns,
            metric,
        }
    }

    #[test]
    fn empty_input_yields_empty_grid() {
        let result = build_heatmap(
            &[],
            &request(RowMode::PerVehicle, ColumnMode::Providers, Metric::BestPrice),
            &Scorer::default(),
        );
        assert!(result.rows.is_empty());
        assert!(result.columns.is_empty());
        assert!(result.cells.is_empty());
        assert_eq!(result.metric, Metric::BestPrice);
    }

    #[test]
    fn zero_matching_rows_yields_empty_grid() {
        let rates = vec![rate(
            "CAP1",
            "BMW",
            "3 Series",
            "LEX",
            ContractType::BusinessContractHire,
            40_000,
        )];
        let mut req = request(RowMode::PerVehicle, ColumnMode::Providers, Metric::RateCount);
        req.filter.manufacturers = vec!["Audi".to_string()];

        let result = build_heatmap(&rates, &req, &Scorer::default());
        assert!(result.rows.is_empty());
        assert!(result.cells.is_empty());
    }

    #[test]
    fn provider_columns_carry_min_max_count() {
        let rates = vec![
            rate("CAP1", "BMW", "3 Series", "LEX", ContractType::BusinessContractHire, 40_000),
            rate("CAP1", "BMW", "3 Series", "LEX", ContractType::BusinessContractHire, 44_000),
            rate("CAP1", "BMW", "3 Series", "ALD", ContractType::BusinessContractHire, 39_000),
        ];
        let result = build_heatmap(
            &rates,
            &request(RowMode::PerVehicle, ColumnMode::Providers, Metric::BestPrice),
            &Scorer::default(),
        );

        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.columns.len(), 2);

        let lex = result
            .cells
            .iter()
            .find(|c| c.column_id == "LEX")
            .unwrap();
        assert_eq!(lex.min, Some(40_000));
        assert_eq!(lex.max, Some(44_000));
        assert_eq!(lex.count, 2);
        assert_eq!(lex.value, 40_000);
    }

    #[test]
    fn make_model_rows_group_derivatives() {
        let rates = vec![
            rate("CAP1", "BMW", "3 Series", "LEX", ContractType::BusinessContractHire, 40_000),
            rate("CAP2", "BMW", "3-Series", "LEX", ContractType::BusinessContractHire, 42_000),
            rate("CAP3", "Audi", "A4", "LEX", ContractType::BusinessContractHire, 41_000),
        ];
        let result = build_heatmap(
            &rates,
            &request(RowMode::PerMakeModel, ColumnMode::Providers, Metric::RateCount),
            &Scorer::default(),
        );

        assert_eq!(result.rows.len(), 2);
        let bmw_cell = result
            .cells
            .iter()
            .find(|c| c.row_id == "bmw|3series")
            .unwrap();
        assert_eq!(bmw_cell.count, 2);
        assert_eq!(bmw_cell.value, 2);
    }

    #[test]
    fn contract_type_columns_split_the_book() {
        let rates = vec![
            rate("CAP1", "BMW", "3 Series", "LEX", ContractType::BusinessContractHire, 40_000),
            rate("CAP1", "BMW", "3 Series", "LEX", ContractType::PersonalContractHire, 47_000),
        ];
        let result = build_heatmap(
            &rates,
            &request(
                RowMode::PerVehicle,
                ColumnMode::ContractTypes,
                Metric::PriceRange,
            ),
            &Scorer::default(),
        );

        assert_eq!(result.columns.len(), 2);
        let bch = result.cells.iter().find(|c| c.column_id == "BCH").unwrap();
        assert_eq!(bch.count, 1);
        assert_eq!(bch.value, 0); // single rate, no spread
    }

    #[test]
    fn filters_apply_before_grouping() {
        let mut stale = rate(
            "CAP9",
            "BMW",
            "3 Series",
            "LEX",
            ContractType::BusinessContractHire,
            20_000,
        );
        stale.snapshot_is_latest = false;
        let rates = vec![
            stale,
            rate("CAP1", "BMW", "3 Series", "LEX", ContractType::BusinessContractHire, 40_000),
            rate("CAP2", "BMW", "5 Series", "LEX", ContractType::BusinessContractHire, 80_000),
        ];

        let mut req = request(RowMode::PerVehicle, ColumnMode::Providers, Metric::BestPrice);
        req.filter.max_price = Some(50_000);
        req.filter.search = Some("3 series".to_string());

        let result = build_heatmap(&rates, &req, &Scorer::default());
        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0].id, "CAP1");
    }

    #[test]
    fn min_score_filter_consults_the_scorer() {
        let mut weak = rate(
            "CAP1",
            "BMW",
            "3 Series",
            "LEX",
            ContractType::BusinessContractHire,
            40_000,
        );
        weak.cached_score = Some(30);
        let strong = rate(
            "CAP2",
            "BMW",
            "5 Series",
            "LEX",
            ContractType::BusinessContractHire,
            42_000,
        );

        let mut req = request(RowMode::PerVehicle, ColumnMode::Providers, Metric::RateCount);
        req.filter.min_score = Some(60);

        let result = build_heatmap(&[weak, strong], &req, &Scorer::default());
        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0].id, "CAP2");
    }

    #[test]
    fn row_cap_clamps_to_bounds() {
        let mut rates = Vec::new();
        for i in 0..40 {
            rates.push(rate(
                &format!("CAP{i:02}"),
                "Kia",
                &format!("Ceed {i:02}"),
                "LEX",
                ContractType::BusinessContractHire,
                30_000 + i64::from(i) * 100,
            ));
        }

        // Requests below the minimum clamp up to it.
        let mut req = request(RowMode::PerVehicle, ColumnMode::Providers, Metric::RateCount);
        req.filter.row_limit = Some(5);
        let result = build_heatmap(&rates, &req, &Scorer::default());
        assert_eq!(result.rows.len(), MIN_ROW_LIMIT);

        req.filter.row_limit = Some(1000);
        let result = build_heatmap(&rates, &req, &Scorer::default());
        assert_eq!(result.rows.len(), 40);
    }
}
