// SPDX-License-Identifier: MIT OR Apache-2.0
use prettylog::NotificationDestination;
use prettylog::destination::{ChatId, expand_home, resolve_token};
use std::fs;

// only test in this binary, so nothing else reads HOME while it changes
#[test]
fn tilde_paths_resolve_against_home() {
    let home = tempfile::tempdir().unwrap();
    // SAFETY: no other thread of this test binary touches the environment
    unsafe { std::env::set_var("HOME", home.path()) };

    fs::create_dir(home.path().join(".secrets")).unwrap();
    fs::write(home.path().join(".secrets/chat_id.txt"), " 777 \n").unwrap();
    fs::write(home.path().join(".secrets/token.txt"), "55:from-file\nignored\n").unwrap();

    assert_eq!(
        expand_home("~/.secrets/token.txt").unwrap(),
        home.path().join(".secrets/token.txt")
    );
    assert_eq!(ChatId::from("~/.secrets/chat_id.txt").resolve().unwrap(), 777);
    assert_eq!(resolve_token("~/.secrets/token.txt").unwrap(), "55:from-file");
    // no such file: the text is the token
    assert_eq!(resolve_token("~/.secrets/absent").unwrap(), "~/.secrets/absent");

    let destination =
        NotificationDestination::new("~/.secrets/chat_id.txt", "~/.secrets/token.txt");
    assert_eq!(
        destination.resolve_credentials().unwrap(),
        Some((777, "55:from-file".to_string()))
    );
}
