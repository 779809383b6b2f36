use super::*;
use crate::config::IdentityConfig;
use crate::display::StatusKind;
use crate::state::Channel;
use chrono::{Duration, Utc};

fn server() -> ServerState {
    let identity = IdentityConfig {
        nick: "alice".into(),
        ..IdentityConfig::default()
    };
    ServerState::new("irc.test:6667", &identity)
}

fn feed(server: &mut ServerState, line: &str) -> Handled {
    handle(server, &Message::parse(line), line, Origin::Live)
}

fn present(server: &ServerState, channel: &str) -> Vec<String> {
    server
        .channel(channel)
        .map(|c| c.present_members().map(str::to_owned).collect())
        .unwrap_or_default()
}

// ============================================================================
// JOIN / PART lifecycle
// ============================================================================

#[test]
fn self_join_creates_and_activates() {
    let mut state = server();
    let handled = feed(&mut state, ":alice!a@h JOIN #test");

    assert!(state.has_channel("#test"));
    assert_eq!(state.active_name(), Some("#test"));
    assert_eq!(handled.channel.as_deref(), Some("#test"));
    assert_eq!(handled.events[0], DisplayEvent::Clear);
    assert!(matches!(
        handled.events[1],
        DisplayEvent::Status { kind: StatusKind::Join, .. }
    ));
    assert_eq!(present(&state, "#test"), vec!["alice"]);
    assert_eq!(state.channel("#test").unwrap().log, vec![":alice!a@h JOIN #test"]);
}

#[test]
fn foreign_join_to_unknown_channel_creates_nothing() {
    let mut state = server();
    let handled = feed(&mut state, ":bob!b@h JOIN #test");

    assert!(!state.has_channel("#test"));
    assert!(handled.events.is_empty());
}

#[test]
fn join_part_cycles_keep_channel_set_consistent() {
    let mut state = server();
    for _ in 0..3 {
        feed(&mut state, ":alice!a@h JOIN #c");
        assert!(state.has_channel("#c"));
        assert_eq!(state.active_name(), Some("#c"));

        feed(&mut state, ":alice!a@h PART #c");
        assert!(!state.has_channel("#c"));
        assert_eq!(state.active_name(), None);
    }
}

#[test]
fn rejoin_starts_a_fresh_log() {
    let mut state = server();
    feed(&mut state, ":alice!a@h JOIN #c");
    feed(&mut state, ":bob!b@h PRIVMSG #c :old");
    feed(&mut state, ":alice!a@h PART #c");
    feed(&mut state, ":alice!a@h JOIN #c");

    assert_eq!(state.channel("#c").unwrap().log, vec![":alice!a@h JOIN #c"]);
}

#[test]
fn foreign_part_marks_absent_and_notes_in_active() {
    let mut state = server();
    feed(&mut state, ":alice!a@h JOIN #c");
    feed(&mut state, ":bob!b@h JOIN #c");

    let handled = feed(&mut state, ":bob!b@h PART #c :gone fishing");

    assert_eq!(present(&state, "#c"), vec!["alice"]);
    assert!(state.channel("#c").unwrap().members.contains_key("bob"));
    assert_eq!(
        handled.events,
        vec![DisplayEvent::status(
            StatusKind::Part,
            "bob has left #c (gone fishing)"
        )]
    );
}

#[test]
fn part_of_inactive_channel_is_silent() {
    let mut state = server();
    feed(&mut state, ":alice!a@h JOIN #a");
    feed(&mut state, ":bob!b@h JOIN #a");
    feed(&mut state, ":alice!a@h JOIN #b");

    let handled = feed(&mut state, ":bob!b@h PART #a");

    assert!(handled.events.is_empty());
    assert!(!state.channel("#a").unwrap().is_member("bob"));
}

#[test]
fn self_part_of_active_reselects_most_recent() {
    let mut state = server();
    let now = Utc::now();
    let mut a = Channel::new("#a");
    a.last_active_at = now - Duration::minutes(10);
    let mut b = Channel::new("#b");
    b.last_active_at = now - Duration::minutes(5);
    state.insert_channel(a);
    state.insert_channel(b);
    feed(&mut state, ":alice!a@h JOIN #c");
    assert_eq!(state.active_name(), Some("#c"));

    feed(&mut state, ":alice!a@h PART #c");

    assert!(!state.has_channel("#c"));
    assert_eq!(state.active_name(), Some("#b"));
}

// ============================================================================
// PRIVMSG
// ============================================================================

#[test]
fn privmsg_shown_only_for_active_channel() {
    let mut state = server();
    feed(&mut state, ":alice!a@h JOIN #a");
    feed(&mut state, ":alice!a@h JOIN #b");

    let shown = feed(&mut state, ":bob!b@h PRIVMSG #b :hello there");
    let hidden = feed(&mut state, ":bob!b@h PRIVMSG #a :elsewhere");

    assert_eq!(
        shown.events,
        vec![DisplayEvent::Message {
            channel: "#b".into(),
            sender: "bob".into(),
            text: "hello there".into(),
        }]
    );
    assert!(hidden.events.is_empty());
    // Both are logged
    assert_eq!(state.channel("#a").unwrap().log.len(), 2);
    assert_eq!(state.channel("#b").unwrap().log.len(), 2);
}

#[test]
fn private_message_always_shown() {
    let mut state = server();
    let handled = feed(&mut state, ":bob!b@h PRIVMSG alice :psst");

    assert_eq!(handled.channel, None);
    assert_eq!(
        handled.events,
        vec![DisplayEvent::Private {
            sender: "bob".into(),
            text: "psst".into(),
        }]
    );
}

// ============================================================================
// QUIT / NICK / KICK
// ============================================================================

#[test]
fn quit_clears_membership_in_every_channel() {
    let mut state = server();
    feed(&mut state, ":alice!a@h JOIN #a");
    feed(&mut state, ":bob!b@h JOIN #a");
    feed(&mut state, ":alice!a@h JOIN #b");
    feed(&mut state, ":bob!b@h JOIN #b");

    let handled = feed(&mut state, ":bob!b@h QUIT :Ping timeout");

    assert!(!state.channel("#a").unwrap().is_member("bob"));
    assert!(!state.channel("#b").unwrap().is_member("bob"));
    assert_eq!(
        handled.events,
        vec![DisplayEvent::status(StatusKind::Quit, "bob has quit (Ping timeout)")]
    );
}

#[test]
fn quit_of_stranger_is_silent() {
    let mut state = server();
    feed(&mut state, ":alice!a@h JOIN #a");

    let handled = feed(&mut state, ":carol!c@h QUIT :bye");
    assert!(handled.events.is_empty());
}

#[test]
fn own_nick_change_updates_identity() {
    let mut state = server();
    feed(&mut state, ":alice!a@h JOIN #a");

    let handled = feed(&mut state, ":alice!a@h NICK alicia");

    assert_eq!(state.nickname, "alicia");
    assert_eq!(present(&state, "#a"), vec!["alicia"]);
    assert_eq!(
        handled.events,
        vec![DisplayEvent::status(StatusKind::Nick, "You are now known as alicia")]
    );
}

#[test]
fn foreign_nick_change_moves_membership() {
    let mut state = server();
    feed(&mut state, ":alice!a@h JOIN #a");
    feed(&mut state, ":bob!b@h JOIN #a");
    feed(&mut state, ":alice!a@h JOIN #b");

    // #b is active and bob is not there: no note
    let handled = feed(&mut state, ":bob!b@h NICK robert");

    assert!(handled.events.is_empty());
    assert_eq!(present(&state, "#a"), vec!["alice", "robert"]);
    assert_eq!(state.nickname, "alice");
}

#[test]
fn kick_of_other_user_in_active_channel() {
    let mut state = server();
    feed(&mut state, ":alice!a@h JOIN #a");
    feed(&mut state, ":carol!c@h JOIN #a");

    let handled = feed(&mut state, ":op!o@h KICK #a carol :spam");

    assert!(state.has_channel("#a"));
    assert!(!state.channel("#a").unwrap().is_member("carol"));
    assert_eq!(
        handled.events,
        vec![DisplayEvent::status(
            StatusKind::Kick,
            "carol was kicked from #a by op (spam)"
        )]
    );
}

#[test]
fn self_kick_drops_channel_and_reselects() {
    let mut state = server();
    feed(&mut state, ":alice!a@h JOIN #a");
    feed(&mut state, ":alice!a@h JOIN #b");

    let handled = feed(&mut state, ":op!o@h KICK #b alice");

    assert!(!state.has_channel("#b"));
    assert_eq!(state.active_name(), Some("#a"));
    assert_eq!(
        handled.events,
        vec![DisplayEvent::status(
            StatusKind::Kick,
            "You have been kicked from #b by op"
        )]
    );
}

// ============================================================================
// Numerics and the default branch
// ============================================================================

#[test]
fn names_reply_strips_prefixes() {
    let mut state = server();
    feed(&mut state, ":alice!a@h JOIN #test");

    feed(&mut state, ":irc.test 353 alice = #test :alice @bob +carol");

    assert_eq!(present(&state, "#test"), vec!["alice", "bob", "carol"]);
}

#[test]
fn names_reply_for_unknown_channel_creates_nothing() {
    let mut state = server();
    feed(&mut state, ":irc.test 353 alice = #else :bob");
    assert!(!state.has_channel("#else"));
}

#[test]
fn motd_and_end_of_names_are_silent() {
    let mut state = server();
    for line in [
        ":irc.test 375 alice :- irc.test Message of the day -",
        ":irc.test 372 alice :- be nice",
        ":irc.test 376 alice :End of /MOTD command.",
        ":irc.test 366 alice #test :End of /NAMES list.",
    ] {
        assert_eq!(feed(&mut state, line), Handled::default());
    }
}

#[test]
fn unknown_command_becomes_note() {
    let mut state = server();
    let handled = feed(&mut state, ":irc.test 001 alice :Welcome to the Test Network");
    assert_eq!(
        handled.events,
        vec![DisplayEvent::note("Welcome to the Test Network")]
    );

    let handled = feed(&mut state, "NOTICE AUTH :*** Looking up your hostname");
    assert_eq!(
        handled.events,
        vec![DisplayEvent::note("*** Looking up your hostname")]
    );
}

#[test]
fn empty_line_is_noop() {
    let mut state = server();
    assert_eq!(feed(&mut state, ""), Handled::default());
}

// ============================================================================
// Replay
// ============================================================================

#[test]
fn replay_reproduces_membership_without_logging() {
    let mut state = server();
    feed(&mut state, ":alice!a@h JOIN #c");
    feed(&mut state, ":bob!b@h JOIN #c");
    feed(&mut state, ":carol!c@h JOIN #c");
    feed(&mut state, ":bob!b@h PRIVMSG #c :hi all");
    feed(&mut state, ":carol!c@h PART #c");

    let members_before = state.channel("#c").unwrap().members.clone();
    let log_before = state.channel("#c").unwrap().log.clone();

    let events = replay(&state, "#c");

    let chan = state.channel("#c").unwrap();
    assert_eq!(chan.members, members_before);
    assert_eq!(chan.log, log_before);
    // No clear: the channel already exists
    assert!(!events.contains(&DisplayEvent::Clear));
    assert!(events.contains(&DisplayEvent::Message {
        channel: "#c".into(),
        sender: "bob".into(),
        text: "hi all".into(),
    }));
}

#[test]
fn replay_keeps_quits_and_renames() {
    let mut state = server();
    feed(&mut state, ":alice!a@h JOIN #c");
    feed(&mut state, ":bob!b@h JOIN #c");
    feed(&mut state, ":carol!c@h JOIN #c");
    feed(&mut state, ":bob!b@h QUIT :gone");
    feed(&mut state, ":carol!c@h NICK caroline");
    assert_eq!(present(&state, "#c"), ["alice", "caroline"]);

    let events = replay(&state, "#c");

    assert_eq!(present(&state, "#c"), ["alice", "caroline"]);
    assert!(events.contains(&DisplayEvent::status(
        StatusKind::Join,
        "bob has joined #c"
    )));
}

#[test]
fn replay_after_self_rename_keeps_identity() {
    let mut state = server();
    feed(&mut state, ":alice!a@h JOIN #c");
    feed(&mut state, ":alice!a@h NICK alicia");
    assert_eq!(present(&state, "#c"), ["alicia"]);

    replay(&state, "#c");
    replay(&state, "#c");

    assert_eq!(present(&state, "#c"), ["alicia"]);
    assert_eq!(state.nickname, "alicia");
    assert_eq!(state.active_name(), Some("#c"));
}

#[test]
fn replay_of_unknown_channel_is_empty() {
    let mut state = server();
    assert!(replay(&state, "#nope").is_empty());
}

// ============================================================================
// End to end
// ============================================================================

#[test]
fn join_then_names_scenario() {
    let mut state = server();

    feed(&mut state, ":bob!b@h JOIN #test");
    assert!(!state.has_channel("#test"));

    feed(&mut state, ":alice!a@h JOIN #test");
    assert!(state.has_channel("#test"));
    assert_eq!(state.active_name(), Some("#test"));

    feed(&mut state, ":irc.test 353 alice = #test :alice @bob");
    assert_eq!(present(&state, "#test"), vec!["alice", "bob"]);
}
