//! Lobby lifecycle tests through the manager and actor handles.

use inhouse::lobby::{
    AlternativeView, InhouseMode, LobbyConfig, LobbyError, LobbyHandle, LobbyManager, Participant,
};

const RATINGS: [u32; 10] = [1200, 3400, 2100, 5000, 800, 4300, 2900, 3900, 1500, 2600];

async fn fill(lobby: &LobbyHandle) {
    for (i, rating) in RATINGS.into_iter().enumerate() {
        let id = i as i64 + 1;
        lobby
            .join(Participant::new(id, format!("player{}", id), rating))
            .await
            .expect("join");
    }
}

fn teams(view: AlternativeView) -> inhouse::lobby::TeamsView {
    match view {
        AlternativeView::Teams(teams) => teams,
        AlternativeView::Draft(_) => panic!("expected teams"),
    }
}

fn draft(view: AlternativeView) -> inhouse::lobby::DraftView {
    match view {
        AlternativeView::Draft(draft) => draft,
        AlternativeView::Teams(_) => panic!("expected draft"),
    }
}

#[tokio::test]
async fn test_regular_lobby_flow() {
    let manager = LobbyManager::default();
    let lobby = manager
        .open_lobby(100, InhouseMode::Regular, "penguin".into())
        .await;

    assert_eq!(
        lobby.generate().await.unwrap_err(),
        LobbyError::InvalidRosterSize {
            expected: 10,
            actual: 0
        }
    );

    fill(&lobby).await;
    let view = lobby.view().await.expect("view");
    assert!(view.ready);

    let first = teams(lobby.generate().await.expect("generate"));
    assert_eq!(first.roll, 1);
    assert_eq!(first.max_rolls, 5);
    assert_eq!(first.password, "penguin");
    assert_eq!(first.team_one.len(), 5);
    assert!(
        first
            .team_one
            .windows(2)
            .all(|w| w[0].rating >= w[1].rating)
    );

    // Generating again without changes shows the same split
    assert_eq!(teams(lobby.generate().await.expect("generate")), first);

    let mut fairness = vec![first.fairness];
    for roll in 2..=5 {
        let view = teams(lobby.reroll().await.expect("reroll"));
        assert_eq!(view.roll, roll);
        fairness.push(view.fairness);
    }
    assert!(fairness.windows(2).all(|w| w[0] <= w[1]));

    let wrapped = teams(lobby.reroll().await.expect("reroll"));
    assert_eq!(wrapped, first);
}

#[tokio::test]
async fn test_roster_change_invalidates_rotation() {
    let manager = LobbyManager::default();
    let lobby = manager
        .open_lobby(101, InhouseMode::Regular, "penguin".into())
        .await;
    fill(&lobby).await;
    lobby.generate().await.expect("generate");

    let outcome = lobby.leave(4).await.expect("leave");
    assert!(outcome.left_full_lobby);
    assert_eq!(outcome.lobby.player_count, 9);
    assert_eq!(lobby.reroll().await.unwrap_err(), LobbyError::NoActiveRotation);

    lobby
        .join(Participant::new(11, "sub", 4950))
        .await
        .expect("join");
    let view = teams(lobby.generate().await.expect("generate"));
    assert_eq!(view.roll, 1);
    assert!(
        view.team_one
            .iter()
            .chain(view.team_two.iter())
            .any(|p| p.id == 11)
    );
}

#[tokio::test]
async fn test_full_lobby_rejects_joins_and_keeps_rotation() {
    let manager = LobbyManager::default();
    let lobby = manager
        .open_lobby(102, InhouseMode::Regular, "penguin".into())
        .await;
    fill(&lobby).await;
    lobby.generate().await.expect("generate");

    assert_eq!(
        lobby
            .join(Participant::new(11, "late", 1000))
            .await
            .unwrap_err(),
        LobbyError::RosterFull { capacity: 10 }
    );
    // Full check comes before the duplicate check
    assert_eq!(
        lobby
            .join(Participant::new(1, "again", 1000))
            .await
            .unwrap_err(),
        LobbyError::RosterFull { capacity: 10 }
    );

    // Rejected joins leave the rotation in place
    assert!(lobby.reroll().await.is_ok());
}

#[tokio::test]
async fn test_batch_add_and_remove() {
    let manager = LobbyManager::default();
    let lobby = manager
        .open_lobby(103, InhouseMode::Regular, "penguin".into())
        .await;

    let outcome = lobby
        .add_many(vec![
            Participant::new(1, "a", 100),
            Participant::new(2, "b", 200),
            Participant::new(1, "a", 100),
        ])
        .await
        .expect("add");
    assert_eq!(outcome.applied.len(), 2);
    assert_eq!(outcome.rejected.len(), 1);
    assert_eq!(outcome.rejected[0].user_id, 1);

    let outcome = lobby.remove_many(vec![2, 9]).await.expect("remove");
    assert_eq!(outcome.applied.len(), 1);
    assert_eq!(outcome.rejected[0].user_id, 9);
    assert_eq!(outcome.lobby.player_count, 1);
    assert!(!outcome.left_full_lobby);
}

#[tokio::test]
async fn test_draft_mode_cycles() {
    let manager = LobbyManager::default();
    let lobby = manager
        .open_lobby(104, InhouseMode::Immortal, "penguin".into())
        .await;
    fill(&lobby).await;

    let first = draft(lobby.generate().await.expect("generate"));
    assert_eq!(first.roll, 0);
    assert_eq!(first.max_rolls, 3);
    assert_eq!(first.pool.len(), 8);
    assert_eq!(
        AlternativeView::Draft(first.clone()).roll_label(),
        "Roll #0/3"
    );

    let rolls: Vec<usize> = {
        let mut rolls = Vec::new();
        for _ in 0..5 {
            rolls.push(draft(lobby.reroll().await.expect("reroll")).roll);
        }
        rolls
    };
    assert_eq!(rolls, vec![1, 2, 3, 0, 1]);
}

#[tokio::test]
async fn test_mode_change_drops_rotation() {
    let manager = LobbyManager::default();
    let lobby = manager
        .open_lobby(105, InhouseMode::Regular, "penguin".into())
        .await;
    fill(&lobby).await;
    lobby.generate().await.expect("generate");

    // Same mode keeps the rotation
    lobby.set_mode(InhouseMode::Regular).await.expect("mode");
    assert!(lobby.reroll().await.is_ok());

    let view = lobby.set_mode(InhouseMode::Immortal).await.expect("mode");
    assert_eq!(view.mode, InhouseMode::Immortal);
    assert_eq!(lobby.reroll().await.unwrap_err(), LobbyError::NoActiveRotation);
    assert!(matches!(
        lobby.generate().await.expect("generate"),
        AlternativeView::Draft(_)
    ));
}

#[tokio::test]
async fn test_alert_targets_require_full_lobby() {
    let manager = LobbyManager::new(LobbyConfig::default());
    let lobby = manager
        .open_lobby(106, InhouseMode::Regular, "penguin".into())
        .await;

    assert!(lobby.alert_targets().await.is_err());
    fill(&lobby).await;
    assert_eq!(
        lobby.alert_targets().await.expect("targets"),
        (1..=10).collect::<Vec<i64>>()
    );
}

#[tokio::test]
async fn test_reset_and_password() {
    let manager = LobbyManager::default();
    let lobby = manager
        .open_lobby(107, InhouseMode::Regular, "penguin".into())
        .await;
    fill(&lobby).await;
    lobby.generate().await.expect("generate");

    let view = lobby.set_password("walrus".into()).await.expect("password");
    assert_eq!(view.password, "walrus");
    // Password changes keep the rotation and show up in the next render
    let rerolled = teams(lobby.reroll().await.expect("reroll"));
    assert_eq!(rerolled.password, "walrus");

    let view = lobby.reset().await.expect("reset");
    assert_eq!(view.player_count, 0);
    assert_eq!(lobby.current_alternative().await.expect("alive"), None);
}

#[tokio::test]
async fn test_configured_max_rolls() {
    let manager = LobbyManager::new(LobbyConfig {
        max_rolls: 2,
        ..LobbyConfig::default()
    });
    let lobby = manager
        .open_lobby(108, InhouseMode::Regular, "penguin".into())
        .await;
    fill(&lobby).await;

    let first = teams(lobby.generate().await.expect("generate"));
    assert_eq!(teams(lobby.reroll().await.expect("reroll")).roll, 2);
    assert_eq!(teams(lobby.reroll().await.expect("reroll")), first);
}
