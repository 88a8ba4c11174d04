//! Menu browsing sub-flow
//!
//! Stateless: every step's selection travels in the next payload
//! (`menu|branch=X|cat=Y|len=Z`), so the flow never touches the session.

use super::resolver::{MenuResolver, Resolution, ALL_CATEGORIES};
use crate::branch::Branch;
use crate::prompt::{Choice, Prompt};

const PAYLOAD_PREFIX: &str = "menu";

const BRANCH_TITLE: &str = "Choose a branch / เลือกสาขา / 店舗を選択";
const CATEGORY_TITLE: &str = "Which menu? (Coloring / Treatment / Add-ons / Show All)";
const LENGTH_TITLE: &str = "Select hair length";
const ALL_TITLE: &str = "All menus for this branch:";
const SHOW_ALL_LABEL: &str = "Show All";

/// Selections carried by a menu payload
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuAction {
    pub branch: Option<String>,
    pub category: Option<String>,
    pub length: Option<String>,
}

impl MenuAction {
    /// Parse a `menu|key=value|...` payload; `None` if it is not a menu payload
    pub fn parse(data: &str) -> Option<Self> {
        let mut parts = data.split('|');
        if parts.next()? != PAYLOAD_PREFIX {
            return None;
        }
        let mut action = MenuAction::default();
        for part in parts {
            let Some((key, value)) = part.split_once('=') else {
                continue;
            };
            let value = (!value.is_empty()).then(|| value.to_string());
            match key {
                "branch" => action.branch = value,
                "cat" => action.category = value,
                "len" => action.length = value,
                _ => {}
            }
        }
        Some(action)
    }

    pub fn for_branch(branch: Branch) -> Self {
        Self {
            branch: Some(branch.id().to_string()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn with_length(mut self, length: impl Into<String>) -> Self {
        self.length = Some(length.into());
        self
    }

    pub fn payload(&self) -> String {
        let mut payload = PAYLOAD_PREFIX.to_string();
        for (key, value) in [
            ("branch", &self.branch),
            ("cat", &self.category),
            ("len", &self.length),
        ] {
            if let Some(value) = value {
                payload.push_str(&format!("|{key}={value}"));
            }
        }
        payload
    }
}

/// Label for a hair-length code; unknown codes show as-is
fn length_label(code: &str) -> &str {
    match code {
        "RET" => "Retouch (roots)",
        "S" => "S – Not beyond jawline",
        "M" => "M – Not beyond collarbone",
        "L" => "L – Beyond collarbone",
        "XL" => "XL – Mid-back downward",
        other => other,
    }
}

fn bilingual_branch_label(branch: Branch) -> &'static str {
    match branch {
        Branch::ThongLo => "Thong Lo / ทองหล่อ",
        Branch::PhromPhong => "Phrom Phong / พร้อมพงษ์",
    }
}

/// Drives menu browsing from trigger to price listing
#[derive(Debug, Clone)]
pub struct MenuFlow {
    resolver: MenuResolver,
}

impl MenuFlow {
    pub fn new(resolver: MenuResolver) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &MenuResolver {
        &self.resolver
    }

    /// Entry point for the menu keyword; skips branch choice when the
    /// booking already names one
    pub fn on_trigger(&self, known_branch: Option<Branch>) -> Vec<Prompt> {
        match known_branch {
            Some(branch) => vec![self.category_selector(branch)],
            None => vec![Self::branch_selector()],
        }
    }

    pub fn on_action(&self, action: &MenuAction) -> Vec<Prompt> {
        let Some(branch) = action.branch.as_deref().and_then(Branch::from_id) else {
            return vec![Self::branch_selector()];
        };
        let Some(category) = action.category.as_deref() else {
            return vec![self.category_selector(branch)];
        };

        if category == ALL_CATEGORIES {
            return vec![self.all_sections(branch)];
        }

        let length = action.length.as_deref();
        if length.is_none()
            && self.resolver.requires_length(category)
            && !self.resolver.lengths(branch.id()).is_empty()
        {
            return vec![self.length_selector(branch, category)];
        }

        let resolution = self.resolver.resolve(branch.id(), category, length);
        tracing::debug!(
            branch = branch.id(),
            category,
            length = length.unwrap_or("-"),
            found = !matches!(resolution, Resolution::UnknownCategory),
            "Menu listing"
        );
        match resolution {
            Resolution::Navigation(_) => vec![self.all_sections(branch)],
            Resolution::UnknownCategory | Resolution::Lines(_) => vec![Prompt::PriceListing {
                lines: self.resolver.render_lines(&resolution),
            }],
        }
    }

    fn branch_selector() -> Prompt {
        Prompt::selector(
            BRANCH_TITLE,
            Branch::ALL
                .into_iter()
                .map(|branch| {
                    Choice::postback(
                        bilingual_branch_label(branch),
                        MenuAction::for_branch(branch).payload(),
                    )
                })
                .collect(),
        )
    }

    fn category_selector(&self, branch: Branch) -> Prompt {
        let mut choices = self.category_choices(branch);
        choices.push(Choice::postback(
            SHOW_ALL_LABEL,
            MenuAction::for_branch(branch)
                .with_category(ALL_CATEGORIES)
                .payload(),
        ));
        Prompt::selector(CATEGORY_TITLE, choices)
    }

    fn all_sections(&self, branch: Branch) -> Prompt {
        Prompt::selector(ALL_TITLE, self.category_choices(branch))
    }

    fn category_choices(&self, branch: Branch) -> Vec<Choice> {
        self.resolver
            .categories()
            .into_iter()
            .map(|(id, label)| {
                Choice::postback(label, MenuAction::for_branch(branch).with_category(id).payload())
            })
            .collect()
    }

    fn length_selector(&self, branch: Branch, category: &str) -> Prompt {
        Prompt::selector(
            LENGTH_TITLE,
            self.resolver
                .lengths(branch.id())
                .iter()
                .map(|code| {
                    Choice::postback(
                        length_label(code),
                        MenuAction::for_branch(branch)
                            .with_category(category)
                            .with_length(code.as_str())
                            .payload(),
                    )
                })
                .collect(),
        )
    }
}
