//! Price queries over the pricing table

use super::table::{BranchPricing, MenuPricingTable, Section};
use std::sync::Arc;

/// Category id that asks for navigation instead of prices
pub const ALL_CATEGORIES: &str = "all";

const NOT_FOUND: &str = "Menu not found.";
const CHOOSE_LENGTH: &str = "choose hair length first";

/// How one item prices out for a query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    Price(u64),
    Unavailable,
    ChooseLengthFirst,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceLine {
    pub item: String,
    pub outcome: LineOutcome,
}

/// Result of a category query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// One line per item in the section, in table order
    Lines(Vec<PriceLine>),
    /// `all` was requested: the caller shows a category chooser
    Navigation(Vec<(String, String)>),
    UnknownCategory,
}

/// Resolves branch, category and length queries into price lines
#[derive(Debug, Clone)]
pub struct MenuResolver {
    table: Arc<MenuPricingTable>,
}

impl MenuResolver {
    pub fn new(table: Arc<MenuPricingTable>) -> Self {
        Self { table }
    }

    pub fn resolve(&self, branch: &str, category: &str, length: Option<&str>) -> Resolution {
        if category == ALL_CATEGORIES {
            return Resolution::Navigation(self.categories());
        }
        let Some(section) = self.table.section(category) else {
            return Resolution::UnknownCategory;
        };
        Resolution::Lines(
            section
                .items
                .iter()
                .map(|item| PriceLine {
                    item: item.display_name().to_string(),
                    outcome: price_item(item.per_length, item.branch_prices.get(branch), length),
                })
                .collect(),
        )
    }

    /// Whether the category needs a hair length before pricing
    pub fn requires_length(&self, category: &str) -> bool {
        self.table
            .section(category)
            .is_some_and(Section::requires_length)
    }

    pub fn lengths(&self, branch: &str) -> &[String] {
        self.table.lengths(branch)
    }

    /// `(id, label)` for every section, in table order
    pub fn categories(&self) -> Vec<(String, String)> {
        self.table
            .sections
            .iter()
            .map(|section| (section.id.clone(), section.label().to_string()))
            .collect()
    }

    pub fn render(&self, line: &PriceLine) -> String {
        let rules = &self.table.display_rules;
        match line.outcome {
            LineOutcome::Price(amount) => format!(
                "• {} — {} THB  ({})",
                line.item,
                format_amount(amount),
                rules.note
            ),
            LineOutcome::Unavailable => format!("• {} — {}", line.item, rules.unavailable_note),
            LineOutcome::ChooseLengthFirst => format!("• {} — {CHOOSE_LENGTH}", line.item),
        }
    }

    /// Listing text for a resolution; navigation lists category labels
    pub fn render_lines(&self, resolution: &Resolution) -> Vec<String> {
        match resolution {
            Resolution::Lines(lines) => lines.iter().map(|line| self.render(line)).collect(),
            Resolution::Navigation(categories) => categories
                .iter()
                .map(|(_, label)| format!("• {label}"))
                .collect(),
            Resolution::UnknownCategory => vec![NOT_FOUND.to_string()],
        }
    }
}

fn price_item(per_length: bool, pricing: Option<&BranchPricing>, length: Option<&str>) -> LineOutcome {
    let Some(pricing) = pricing else {
        return LineOutcome::Unavailable;
    };
    if *pricing == BranchPricing::Unavailable {
        return LineOutcome::Unavailable;
    }
    let amount = if per_length {
        let Some(length) = length else {
            return LineOutcome::ChooseLengthFirst;
        };
        pricing.at_length(length)
    } else {
        pricing.flat()
    };
    amount.map_or(LineOutcome::Unavailable, LineOutcome::Price)
}

/// Group digits in threes: `12500` ⇒ `12,500`
pub fn format_amount(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
