//! Category totals and chart series.

use std::collections::HashMap;

use rust_decimal::Decimal;
use tracing::debug;

use spendscope_domain::{
    total_amount, Amounted, BelongsToCategory, Category, Identifiable, Record, RecordKind,
};

/// Alpha applied to border colours to obtain chart fills.
pub const FILL_ALPHA: &str = "0.4";
pub const INCOME_COLOR: &str = "rgba(11, 155, 27, 1)";
pub const OUTCOME_COLOR: &str = "rgba(201, 12, 15, 1)";
pub const BALANCE_TITLE: &str = "General balance";

/// Lower-opacity fill variant of a border colour.
///
/// `rgba(...)` colours get their alpha replaced, `rgb(...)` colours gain one;
/// anything else is returned unchanged.
pub fn fill_color(border: &str) -> String {
    let trimmed = border.trim();
    if let Some(inner) = trimmed
        .strip_prefix("rgba(")
        .and_then(|rest| rest.strip_suffix(')'))
    {
        if let Some(idx) = inner.rfind(',') {
            let (head, alpha) = inner.split_at(idx + 1);
            let spacing = &alpha[..alpha.len() - alpha.trim_start().len()];
            return format!("rgba({head}{spacing}{FILL_ALPHA})");
        }
    } else if let Some(inner) = trimmed
        .strip_prefix("rgb(")
        .and_then(|rest| rest.strip_suffix(')'))
    {
        let separator = if inner.contains(", ") { ", " } else { "," };
        return format!("rgba({inner}{separator}{FILL_ALPHA})");
    }
    border.to_string()
}

/// Sum of the records that share a category name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryBucket {
    pub category_name: String,
    pub amount: Decimal,
    /// Border colour of the first category seen with this name.
    pub color: String,
}

impl CategoryBucket {
    pub fn fill_color(&self) -> String {
        fill_color(&self.color)
    }
}

/// Sums amounts per category name, in first-seen order.
///
/// Items whose category does not resolve are left out.
pub fn aggregate_by_category<T>(items: &[T], categories: &[Category]) -> Vec<CategoryBucket>
where
    T: Amounted + BelongsToCategory,
{
    let by_id: HashMap<_, _> = categories.iter().map(|c| (c.id(), c)).collect();
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut buckets: Vec<CategoryBucket> = Vec::new();

    for item in items {
        let category_id = item.category_id();
        let Some(category) = category_id.and_then(|id| by_id.get(&id)) else {
            debug!(category = ?category_id, "item skipped: unknown category");
            continue;
        };
        match positions.get(category.name.as_str()) {
            Some(&idx) => buckets[idx].amount += item.amount(),
            None => {
                positions.insert(category.name.as_str(), buckets.len());
                buckets.push(CategoryBucket {
                    category_name: category.name.clone(),
                    amount: item.amount(),
                    color: category.color.clone(),
                });
            }
        }
    }
    buckets
}

/// Income and outcome totals of one context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BalanceSummary {
    pub income_total: Decimal,
    pub outcome_total: Decimal,
}

impl BalanceSummary {
    pub fn net(&self) -> Decimal {
        self.income_total - self.outcome_total
    }
}

/// Totals both collections; a missing or empty one counts as zero.
pub fn summarize_balance(incomes: Option<&[Record]>, outcomes: Option<&[Record]>) -> BalanceSummary {
    BalanceSummary {
        income_total: incomes.map(total_amount).unwrap_or_default(),
        outcome_total: outcomes.map(total_amount).unwrap_or_default(),
    }
}

/// A doughnut chart dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartSeries {
    pub title: String,
    pub labels: Vec<String>,
    pub values: Vec<Decimal>,
    pub background_colors: Vec<String>,
    pub border_colors: Vec<String>,
}

impl ChartSeries {
    pub fn from_buckets(title: impl Into<String>, buckets: &[CategoryBucket]) -> Self {
        Self {
            title: title.into(),
            labels: buckets.iter().map(|b| b.category_name.clone()).collect(),
            values: buckets.iter().map(|b| b.amount).collect(),
            background_colors: buckets.iter().map(CategoryBucket::fill_color).collect(),
            border_colors: buckets.iter().map(|b| b.color.clone()).collect(),
        }
    }

    /// Two-slice income vs outcome series with fixed colours.
    pub fn balance(summary: &BalanceSummary) -> Self {
        Self {
            title: BALANCE_TITLE.to_string(),
            labels: vec![
                RecordKind::Income.plural().to_string(),
                RecordKind::Outcome.plural().to_string(),
            ],
            values: vec![summary.income_total, summary.outcome_total],
            background_colors: vec![fill_color(INCOME_COLOR), fill_color(OUTCOME_COLOR)],
            border_colors: vec![INCOME_COLOR.to_string(), OUTCOME_COLOR.to_string()],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Per-category breakdown of one record kind, with its total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryChart {
    pub series: ChartSeries,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextCharts {
    pub balance: ChartSeries,
    pub summary: BalanceSummary,
    /// Present only when there is at least one outcome.
    pub outcomes: Option<CategoryChart>,
    /// Present only when there is at least one income.
    pub incomes: Option<CategoryChart>,
}

/// Chart data for a context, or an explicit empty state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChartReport {
    NoData,
    Charts(ContextCharts),
}

impl ChartReport {
    pub fn has_data(&self) -> bool {
        matches!(self, ChartReport::Charts(_))
    }
}

fn category_chart(
    kind: RecordKind,
    records: Option<&[Record]>,
    categories: &[Category],
) -> Option<CategoryChart> {
    let records = records.filter(|records| !records.is_empty())?;
    let buckets = aggregate_by_category(records, categories);
    Some(CategoryChart {
        series: ChartSeries::from_buckets(kind.plural(), &buckets),
        total: total_amount(records),
    })
}

/// Builds the balance chart and the per-category charts.
///
/// Returns [`ChartReport::NoData`] when both collections are missing or
/// empty instead of zero-valued series.
pub fn build_chart_report(
    incomes: Option<&[Record]>,
    outcomes: Option<&[Record]>,
    categories: &[Category],
) -> ChartReport {
    let is_empty = |records: Option<&[Record]>| records.map_or(true, <[Record]>::is_empty);
    if is_empty(incomes) && is_empty(outcomes) {
        return ChartReport::NoData;
    }
    let summary = summarize_balance(incomes, outcomes);
    ChartReport::Charts(ContextCharts {
        balance: ChartSeries::balance(&summary),
        summary,
        outcomes: category_chart(RecordKind::Outcome, outcomes, categories),
        incomes: category_chart(RecordKind::Income, incomes, categories),
    })
}
