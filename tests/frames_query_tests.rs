use menat::data::{load_dataset, FileSource, TriggerMode};
use menat::frames::format::RICH_COLOR;
use menat::frames::service::{rejection_message, usage_message, DATASET_ERROR_MESSAGE};
use menat::frames::{match_move, FrameIndex, FrameService, MatchOutcome, MatchThresholds, Reply};

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data/frames.json");

fn service() -> FrameService {
    FrameService::load(Box::new(FileSource::new(FIXTURE)), MatchThresholds::default())
        .expect("fixture dataset should load")
}

fn ask(service: &FrameService, raw: &str) -> Reply {
    let mut replies = service.handle(raw, "guile").expect("query should not fail");
    assert_eq!(replies.len(), 1, "exactly one reply per query");
    replies.remove(0)
}

#[test]
fn every_move_key_resolves_to_itself() {
    let dataset = load_dataset(FIXTURE).unwrap();
    let index = FrameIndex::build(&dataset);

    for (name, character) in &dataset.characters {
        let tables = [
            (None, &character.moves.normal),
            (Some(TriggerMode::One), &character.moves.vt_one),
            (Some(TriggerMode::Two), &character.moves.vt_two),
        ];
        for (trigger, table) in tables {
            for key in table.keys() {
                let outcome = match_move(&index, name, key, trigger, MatchThresholds::default())
                    .unwrap_or_else(|| panic!("{name} {key} should match"));
                assert_eq!(outcome.character(), name);
                assert_eq!(outcome.key(), key.to_lowercase(), "{name} {key}");
                assert!(!outcome.is_stat());
            }
        }
    }
}

#[test]
fn every_stat_name_resolves_to_a_stat() {
    let dataset = load_dataset(FIXTURE).unwrap();
    let index = FrameIndex::build(&dataset);

    for (name, character) in &dataset.characters {
        for stat in character.stats.keys() {
            let outcome = match_move(&index, name, stat, None, MatchThresholds::default())
                .unwrap_or_else(|| panic!("{name} {stat} should match"));
            assert!(outcome.is_stat(), "{name} {stat}");
            assert_eq!(outcome.key(), stat);
        }
    }
}

#[test]
fn shorthand_common_name_and_numpad_reach_the_same_move() {
    let dataset = load_dataset(FIXTURE).unwrap();
    let index = FrameIndex::build(&dataset);

    for query in ["cr.mk", "c mk", "crouch mk", "cr.forward", "crouch forward", "2MK"] {
        let outcome = match_move(&index, "ryu", query, None, MatchThresholds::default())
            .unwrap_or_else(|| panic!("{query} should match"));
        assert!(
            matches!(outcome, MatchOutcome::Move { move_key: "crouch mk", .. }),
            "{query} -> {outcome:?}"
        );
    }
}

#[test]
fn plain_query_renders_fixed_template() {
    let service = service();
    let reply = ask(&service, "ryu cr.mk");
    assert_eq!(
        reply,
        Reply::text(
            "Ryu - (crouch mk - cr.MK) - [Startup]: 7 [Active]: 3 [Recovery]: 14 [On Hit]: +4 [On Block]: +1"
        )
    );
}

#[test]
fn mixed_case_move_keys_are_reported_lowercase() {
    let service = service();
    let reply = ask(&service, "ryu st.fierce");
    assert!(reply.as_text().starts_with("Ryu - (stand hp - st.HP) - [Startup]: 6"));
}

#[test]
fn fuzzy_character_name_is_resolved() {
    let service = service();
    let reply = ask(&service, "chun sbk");
    assert!(reply.as_text().starts_with("Chun-Li - (spinning bird kick - charge D, U+K)"));
}

#[test]
fn knockdown_moves_get_advantage_suffix() {
    let service = service();
    let reply = ask(&service, "ryu sweep");
    assert!(reply.as_text().ends_with(
        "[On Hit]: KD [On Block]: -12 [KD Adv]: 28 [Quick Rise Adv]: 28 [Back Rise Adv]: 33 "
    ));
}

#[test]
fn missing_move_text_yields_usage_message() {
    let service = service();
    let reply = ask(&service, "ryu");
    assert_eq!(reply, Reply::text(usage_message("guile")));
    assert!(reply.as_text().contains("incorrect format"));
}

#[test]
fn unknown_move_is_rejected_by_name() {
    let service = service();
    let reply = ask(&service, "Ryu zzz");
    assert_eq!(reply, Reply::text(rejection_message("guile", "Ryu", "zzz")));
    assert!(reply.as_text().contains("Ryu with zzz"));
}

#[test]
fn unknown_character_is_rejected() {
    let service = service();
    let reply = ask(&service, "qwxj hadoken");
    assert!(reply.as_text().starts_with("Don't waste my time guile."));
}

#[test]
fn trigger_tables_are_consulted_in_order() {
    let service = service();

    assert!(ask(&service, "ryu hadoken").as_text().contains("[On Hit]: +2 [On Block]: -6"));
    assert!(ask(&service, "ryu vt1 hadoken").as_text().contains("[On Hit]: +3 [On Block]: -4"));
    assert!(ask(&service, "ryu vt2 hadoken").as_text().contains("[On Hit]: +2 [On Block]: -5"));

    // Trigger-only moves are found without a trigger, but not under the other one.
    assert!(ask(&service, "ryu kakko fuwa").as_text().starts_with("Ryu - (kakko fuwa - HP+HK)"));
    assert_eq!(
        ask(&service, "ryu vt1 kakko fuwa"),
        Reply::text(rejection_message("guile", "ryu", "kakko fuwa"))
    );
}

#[test]
fn stat_category_lists_every_present_field() {
    let service = service();
    assert_eq!(
        ask(&service, "ryu fDash"),
        Reply::text("Ryu - [bDash] - 23 [fDash] - 19 [bDashDist] - 0.8 [fDashDist] - 1.25")
    );
    assert_eq!(
        ask(&service, "chun walk"),
        Reply::text("Chun-Li - [bWalk] - 0.035 [fWalk] - 0.052")
    );
}

#[test]
fn stat_outside_categories_renders_single_line() {
    let service = service();
    assert_eq!(ask(&service, "ryu health"), Reply::text("Ryu - [health] - 1000"));
}

#[test]
fn verbose_flag_only_changes_moves() {
    let service = service();

    let stat = ask(&service, "-v ryu health");
    assert_eq!(stat, ask(&service, "ryu health"));
    assert!(stat.rich_message().is_none());

    let reply = ask(&service, "-v ryu hadoken");
    assert_eq!(
        reply.as_text(),
        "Ryu - (hadoken - QCF+P) - [Startup]: 14 [Active]: - [Recovery]: 31 [On Hit]: +2 [On Block]: -6 [vtc1OnBlock]: +3 [vtc1OnHit]: +30 ```Projectile``` "
    );
    let message = reply.rich_message().expect("verbose move should be rich");
    assert_eq!(message.title, "Ryu");
    assert_eq!(message.description, "hadoken - QCF+P");
    assert_eq!(message.color, RICH_COLOR);
    assert_eq!(message.footer.as_deref(), Some("Projectile"));
    let names: Vec<&str> = message.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(
        names,
        ["Startup", "Active", "Recovery", "On Hit", "On Block", "vtc1OnBlock", "vtc1OnHit"]
    );
}

#[test]
fn verbose_decodes_string_encoded_extra_info() {
    let service = service();
    let reply = ask(&service, "-v ryu sweep");
    let message = reply.rich_message().unwrap();
    assert_eq!(message.footer.as_deref(), Some("Hard to punish on whiff, Low"));
    assert!(reply.as_text().ends_with(" ```Hard to punish on whiff, Low``` "));
    assert!(message.fields.iter().any(|f| f.name == "Back Roll Adv" && f.value == "33"));
}

#[test]
fn asterisks_are_escaped() {
    let service = service();
    let reply = ask(&service, "ryu overhead");
    let text = reply.as_text();
    assert!(text.contains("[On Hit]: +1\\* [On Block]: -2\\*"));
    for (i, _) in text.match_indices('*') {
        assert_eq!(&text[i - 1..i], "\\", "unescaped asterisk in {text}");
    }
}

#[test]
fn missing_dataset_yields_generic_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("frames.json");
    std::fs::copy(FIXTURE, &path).unwrap();

    let service = FrameService::load(Box::new(FileSource::new(&path)), MatchThresholds::default())
        .unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(ask(&service, "ryu cr.mk"), Reply::text(DATASET_ERROR_MESSAGE));
    // Grammar errors are still reported before the dataset is touched.
    assert_eq!(ask(&service, "ryu"), Reply::text(usage_message("guile")));
}
