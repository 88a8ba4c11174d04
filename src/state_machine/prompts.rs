//! Prompts emitted for each booking step

use super::state::{BookingStep, Session};
use crate::branch::Branch;
use crate::i18n::{Language, LANGUAGES};
use crate::prompt::{Choice, Prompt};

/// Quick time-of-day options offered next to the time picker
pub const QUICK_TIMES: [&str; 3] = ["09:00", "13:00", "17:00"];

/// Prompts that ask for the given step's input
pub fn step_prompts(step: BookingStep, session: &Session) -> Vec<Prompt> {
    let lang = session.language_or_base();
    let t = lang.strings();

    match step {
        BookingStep::PickLanguage => language_prompts(),
        BookingStep::PickBranch => vec![Prompt::selector(
            t.pick_branch,
            Branch::ALL
                .into_iter()
                .map(|branch| Choice::postback(branch.label(t), format!("branch={}", branch.id())))
                .collect(),
        )],
        BookingStep::PickDate => vec![Prompt::selector(
            t.pick_date,
            vec![Choice::date_picker("Pick date", "date=pick")],
        )],
        BookingStep::PickTime => {
            let mut choices = vec![Choice::time_picker("Pick time", "time=pick")];
            choices.extend(QUICK_TIMES.iter().map(|time| Choice::message(*time, *time)));
            vec![Prompt::selector(t.pick_time, choices)]
        }
        BookingStep::PickService => {
            let branch = session.fields.branch.unwrap_or(Branch::ThongLo);
            vec![Prompt::selector(
                t.pick_menu,
                vec![Choice::link(branch.menu_label(t), branch.menu_url())],
            )
            .with_subtitle(t.menu_note)]
        }
        BookingStep::AskName => vec![Prompt::text(t.ask_name)],
        BookingStep::AskPhone => vec![Prompt::text(t.ask_phone)],
        BookingStep::AskDiscount => vec![Prompt::text(t.ask_discount)],
        BookingStep::Confirm => vec![Prompt::Confirmation {
            title: t.confirm_title.to_string(),
            summary: session.fields.summary(t.summary_header),
            accept: Choice::postback(t.confirm_button, "confirm=yes"),
            restart: Choice::postback(t.change_button, "confirm=restart"),
        }],
        BookingStep::Completed => vec![],
    }
}

/// Welcome plus a selector labeled in every language
fn language_prompts() -> Vec<Prompt> {
    let t = Language::BASE.strings();
    let labels: Vec<&str> = LANGUAGES.iter().map(|profile| profile.label).collect();

    vec![
        Prompt::text(format!("{}\n{}", t.start_title, t.consult_anytime)),
        Prompt::selector(
            t.pick_language,
            LANGUAGES
                .iter()
                .map(|profile| Choice::postback(profile.label, format!("lang={}", profile.code)))
                .collect(),
        )
        .with_subtitle(labels.join(" / ")),
    ]
}

/// Messages sent once the booking is confirmed
pub fn completion_prompts(session: &Session) -> Vec<Prompt> {
    let t = session.language_or_base().strings();
    let branch = session.fields.branch.unwrap_or(Branch::ThongLo);

    vec![
        Prompt::text(format!("{}\n{}", t.received_title, t.received_body)),
        Prompt::text(session.fields.summary(t.summary_header)),
        Prompt::selector(
            t.registration_header,
            vec![Choice::link(branch.register_label(t), branch.registration_url())],
        )
        .with_subtitle(t.registration_desc),
        Prompt::text(format!("{}\n{}", t.done_hint, t.consult_anytime)),
    ]
}

/// Greeting for a new follower
pub fn follow_prompts() -> Vec<Prompt> {
    let t = Language::BASE.strings();
    vec![
        Prompt::text(format!("{}\n{}", t.start_title, t.start_howto)),
        Prompt::text(t.consult_anytime),
    ]
}
