//! Supported languages and their localized prompt strings
//!
//! Everything language-specific lives in [`LANGUAGES`]: trigger words,
//! free-text name fragments, negation words and the prompt strings. Adding a
//! language means adding a variant and a table row.

use serde::{Deserialize, Serialize};

/// A conversation language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Th,
    Ja,
}

impl Language {
    /// The base language, used when nothing else matches
    pub const BASE: Language = Language::En;

    pub fn profile(self) -> &'static LanguageProfile {
        LANGUAGES
            .iter()
            .find(|profile| profile.language == self)
            .unwrap_or(&LANGUAGES[0])
    }

    pub fn code(self) -> &'static str {
        self.profile().code
    }

    pub fn strings(self) -> &'static Strings {
        &self.profile().strings
    }

    /// Resolve a selector code (`en`, `th`, `ja`)
    pub fn from_code(code: &str) -> Option<Language> {
        let code = code.trim();
        LANGUAGES
            .iter()
            .find(|profile| profile.code.eq_ignore_ascii_case(code))
            .map(|profile| profile.language)
    }

    /// Guess a language from free text by name fragments, falling back to
    /// the base language.
    pub fn from_free_text(text: &str) -> Language {
        let lowered = text.to_lowercase();
        LANGUAGES
            .iter()
            .filter(|profile| profile.language != Language::BASE)
            .find(|profile| profile.name_fragments.iter().any(|f| lowered.contains(f)))
            .map_or(Language::BASE, |profile| profile.language)
    }
}

/// Per-language data row
#[derive(Debug)]
pub struct LanguageProfile {
    pub language: Language,
    pub code: &'static str,
    /// Label shown on the language selector
    pub label: &'static str,
    /// Lowercased fragments recognised when a language is typed instead of picked
    pub name_fragments: &'static [&'static str],
    pub start_trigger: &'static str,
    pub menu_trigger: &'static str,
    /// Words meaning "no discount"
    pub negations: &'static [&'static str],
    pub strings: Strings,
}

/// Localized prompt strings
#[derive(Debug)]
pub struct Strings {
    pub consult_anytime: &'static str,
    pub start_title: &'static str,
    pub start_howto: &'static str,
    pub pick_language: &'static str,
    pub pick_branch: &'static str,
    pub thonglo: &'static str,
    pub phromphong: &'static str,
    pub pick_date: &'static str,
    pub pick_time: &'static str,
    pub pick_menu: &'static str,
    pub menu_note: &'static str,
    pub thonglo_menu: &'static str,
    pub phromphong_menu: &'static str,
    pub ask_name: &'static str,
    pub ask_phone: &'static str,
    pub ask_discount: &'static str,
    pub confirm_title: &'static str,
    pub confirm_button: &'static str,
    pub change_button: &'static str,
    pub received_title: &'static str,
    pub received_body: &'static str,
    pub summary_header: &'static str,
    pub registration_header: &'static str,
    pub registration_desc: &'static str,
    pub register_thonglo: &'static str,
    pub register_phromphong: &'static str,
    pub done_hint: &'static str,
}

/// Nudge sent to free text before any booking has started
pub const HELP_NUDGE: &str =
    "Hi! Type 'book' / 'จอง' / '予約' to start booking.\nYou can also consult our colorists here anytime.";

pub static LANGUAGES: &[LanguageProfile] = &[
    LanguageProfile {
        language: Language::En,
        code: "en",
        label: "English",
        name_fragments: &["eng"],
        start_trigger: "book",
        menu_trigger: "menu",
        negations: &["no", "none"],
        strings: Strings {
            consult_anytime: "You can chat here to consult our colorists anytime.",
            start_title: "Welcome to fufu Hair Color Salon",
            start_howto: "Type 'book' to start your booking in English, 日本語, or ไทย.",
            pick_language: "Choose your language",
            pick_branch: "Which branch would you like?",
            thonglo: "Thong Lo",
            phromphong: "Phrom Phong",
            pick_date: "Pick your preferred DATE",
            pick_time: "Pick your preferred TIME",
            pick_menu: "Which hair menu/treatment would you like?",
            menu_note: "You can view the menu via the button below.",
            thonglo_menu: "Thong Lo Menu",
            phromphong_menu: "Phrom Phong Menu",
            ask_name: "What is your name (English)?",
            ask_phone: "What is your contact phone number?",
            ask_discount: "Any discount code or program to use? (type 'no' if none)",
            confirm_title: "Please confirm your booking details",
            confirm_button: "Confirm Booking",
            change_button: "Start Over",
            received_title: "Booking received",
            received_body: "We will check availability and confirm shortly.",
            summary_header: "Booking Summary",
            registration_header: "New Customer Registration",
            registration_desc: "If you are NEW, please complete registration. Existing customers do not need to register again.",
            register_thonglo: "Register – Thong Lo",
            register_phromphong: "Register – Phrom Phong",
            done_hint: "Thank you! If you have questions, our colorists are here to help anytime.",
        },
    },
    LanguageProfile {
        language: Language::Th,
        code: "th",
        label: "ไทย",
        name_fragments: &["thai", "ไทย"],
        start_trigger: "จอง",
        menu_trigger: "เมนู",
        negations: &["ไม่มี"],
        strings: Strings {
            consult_anytime: "หากมีข้อสงสัย ปรึกษาช่างสีผมได้ตลอดเวลาที่แชตนี้นะคะ",
            start_title: "ยินดีต้อนรับสู่ fufu Hair Color Salon",
            start_howto: "พิมพ์คำว่า 'จอง' เพื่อเริ่มการจอง (รองรับ English / 日本語 / ไทย)",
            pick_language: "กรุณาเลือกภาษา",
            pick_branch: "ต้องการจองสาขาไหนคะ?",
            thonglo: "ทองหล่อ",
            phromphong: "พร้อมพงษ์",
            pick_date: "กรุณาเลือกวันที่ที่สะดวก",
            pick_time: "กรุณาเลือกเวลาที่สะดวก",
            pick_menu: "ต้องการทำบริการเมนูใดคะ?",
            menu_note: "สามารถกดปุ่มด้านล่างเพื่อดูเมนูได้ค่ะ",
            thonglo_menu: "เมนู ทองหล่อ",
            phromphong_menu: "เมนู พร้อมพงษ์",
            ask_name: "ขอทราบชื่อเป็นภาษาอังกฤษค่ะ",
            ask_phone: "รบกวนเบอร์โทรติดต่อค่ะ",
            ask_discount: "มีโค้ดส่วนลดหรืองานโปรฯ ไหมคะ (พิมพ์ 'ไม่มี' ถ้าไม่มี)",
            confirm_title: "โปรดตรวจสอบรายละเอียดการจอง",
            confirm_button: "ยืนยันการจอง",
            change_button: "เริ่มใหม่",
            received_title: "รับคำขอจองเรียบร้อย",
            received_body: "ทางร้านจะตรวจสอบคิวและยืนยันกลับอีกครั้งค่ะ",
            summary_header: "สรุปการจอง",
            registration_header: "แบบฟอร์มลงทะเบียนลูกค้าใหม่",
            registration_desc: "หากเป็นลูกค้าใหม่ กรุณากรอกแบบฟอร์ม ลูกค้าเก่าไม่ต้องลงทะเบียนซ้ำ ขอบคุณค่ะ",
            register_thonglo: "ลงทะเบียน – ทองหล่อ",
            register_phromphong: "ลงทะเบียน – พร้อมพงษ์",
            done_hint: "ขอบคุณค่ะ หากมีคำถาม ปรึกษาช่างได้ตลอดเวลาที่นี่",
        },
    },
    LanguageProfile {
        language: Language::Ja,
        code: "ja",
        label: "日本語",
        name_fragments: &["jap", "日本"],
        start_trigger: "予約",
        menu_trigger: "メニュー",
        negations: &["なし"],
        strings: Strings {
            consult_anytime: "ご不明点は、いつでもこちらのチャットでカラーリストにご相談ください。",
            start_title: "fufu Hair Color Salon へようこそ",
            start_howto: "ご予約は『予約』と入力してください（English / 日本語 / ไทย 対応）",
            pick_language: "言語をお選びください",
            pick_branch: "ご希望の店舗はどちらですか？",
            thonglo: "トンロー店",
            phromphong: "プロンポン店",
            pick_date: "ご希望の日付をお選びください",
            pick_time: "ご希望の時間をお選びください",
            pick_menu: "ご希望のメニュー／トリートメントは？",
            menu_note: "下のボタンからメニューをご確認いただけます。",
            thonglo_menu: "トンロー店メニュー",
            phromphong_menu: "プロンポン店メニュー",
            ask_name: "お名前（英語表記）を教えてください",
            ask_phone: "ご連絡先電話番号を教えてください",
            ask_discount: "割引コードやご利用予定のプロモはありますか？（なければ『なし』）",
            confirm_title: "予約内容をご確認ください",
            confirm_button: "予約を確定",
            change_button: "やり直す",
            received_title: "予約リクエストを受け付けました",
            received_body: "空き状況を確認の上、追ってご連絡いたします。",
            summary_header: "予約内容",
            registration_header: "新規お客様のご登録",
            registration_desc: "新規のお客様はご登録をお願いいたします。既存のお客様は再登録不要です。",
            register_thonglo: "登録 – トンロー店",
            register_phromphong: "登録 – プロンポン店",
            done_hint: "ありがとうございます。ご質問はいつでもお気軽にご相談ください。",
        },
    },
];

/// True if `text` is a "no discount" answer in any supported language
pub fn is_negation(text: &str) -> bool {
    let text = text.trim();
    LANGUAGES
        .iter()
        .flat_map(|profile| profile.negations.iter())
        .any(|word| word.to_lowercase() == text.to_lowercase())
}
