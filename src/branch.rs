//! Salon branches
//!
//! Pricing, menu pages and registration forms are all branch-scoped.

use crate::i18n::Strings;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A physical salon location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Branch {
    #[serde(rename = "THONGLO")]
    ThongLo,
    #[serde(rename = "PHROMPHONG")]
    PhromPhong,
}

impl Branch {
    pub const ALL: [Branch; 2] = [Branch::ThongLo, Branch::PhromPhong];

    /// Identifier used in selector payloads and pricing table keys
    pub fn id(self) -> &'static str {
        match self {
            Branch::ThongLo => "THONGLO",
            Branch::PhromPhong => "PHROMPHONG",
        }
    }

    /// English display name (used in summaries)
    pub fn display_name(self) -> &'static str {
        match self {
            Branch::ThongLo => "Thong Lo",
            Branch::PhromPhong => "Phrom Phong",
        }
    }

    /// Resolve a selector value: the branch id or its English name
    pub fn from_id(value: &str) -> Option<Branch> {
        let value = value.trim();
        Self::ALL.into_iter().find(|branch| {
            branch.id().eq_ignore_ascii_case(value)
                || branch.display_name().eq_ignore_ascii_case(value)
        })
    }

    /// Match typed text against branch-name fragments
    pub fn from_free_text(text: &str) -> Option<Branch> {
        let lowered = text.to_lowercase();
        if lowered.contains("thong") {
            Some(Branch::ThongLo)
        } else if lowered.contains("phrom") || lowered.contains("prom") {
            Some(Branch::PhromPhong)
        } else {
            None
        }
    }

    pub fn label(self, strings: &Strings) -> &'static str {
        match self {
            Branch::ThongLo => strings.thonglo,
            Branch::PhromPhong => strings.phromphong,
        }
    }

    pub fn menu_label(self, strings: &Strings) -> &'static str {
        match self {
            Branch::ThongLo => strings.thonglo_menu,
            Branch::PhromPhong => strings.phromphong_menu,
        }
    }

    pub fn register_label(self, strings: &Strings) -> &'static str {
        match self {
            Branch::ThongLo => strings.register_thonglo,
            Branch::PhromPhong => strings.register_phromphong,
        }
    }

    /// Online menu page
    pub fn menu_url(self) -> &'static str {
        match self {
            Branch::ThongLo => "https://fufuhaircolor.com/thong-lo-%7C-menu",
            Branch::PhromPhong => "https://fufuhaircolor.com/phrom-phong-%7C-menu",
        }
    }

    /// New-customer registration form
    pub fn registration_url(self) -> &'static str {
        match self {
            Branch::ThongLo => "https://forms.gle/pSEPMK6E77a9XTKZ8",
            Branch::PhromPhong => "https://forms.gle/bmNKyN6Yo4w8poN76",
        }
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
