//! Match submission tests covering inhouse ratings, bets and payouts.

use inhouse::{
    db::MemoryStore,
    matches::{FinishedMatch, FixedMatchSource, MatchError, MatchReporter},
    rating::{FixedRatingSource, InhouseRatingConfig, InhouseRatingService, RatingService},
    wallet::{Side, WalletError, WalletManager},
};
use std::sync::Arc;

const GUILD: i64 = 42;

struct Fixture {
    ratings: RatingService,
    inhouse: InhouseRatingService,
    wallet: WalletManager,
    reporter: MatchReporter,
}

/// Users 1..=10 linked to Steam IDs 1001..=1010; users 1..=5 played Radiant
async fn fixture() -> Fixture {
    let store = Arc::new(MemoryStore::new());
    let ratings = RatingService::new(store.clone(), Arc::new(FixedRatingSource::new()));
    let inhouse = InhouseRatingService::new(store.clone(), InhouseRatingConfig::default());
    let wallet = WalletManager::new(store, 1000);

    for user in 1..=10i64 {
        ratings
            .link_account(user, &format!("player{}", user), &(1000 + user).to_string())
            .await
            .expect("link");
    }

    let source = FixedMatchSource::new()
        .with_match(FinishedMatch {
            match_id: 7_000_000_001,
            radiant_win: true,
            radiant: (1001..=1005).collect(),
            dire: (1006..=1010).collect(),
        })
        .with_match(FinishedMatch {
            match_id: 7_000_000_002,
            radiant_win: false,
            radiant: vec![1001, 1002, 1003, 1004, 9999],
            dire: (1006..=1010).collect(),
        });

    let reporter = MatchReporter::new(
        Arc::new(source),
        ratings.clone(),
        inhouse.clone(),
        wallet.clone(),
    );

    Fixture {
        ratings,
        inhouse,
        wallet,
        reporter,
    }
}

#[tokio::test]
async fn test_submit_match_adjusts_ratings_and_pays_bets() {
    let f = fixture().await;

    f.wallet
        .place_bet(GUILD, 20, Side::Radiant, 300, "fan")
        .await
        .expect("bet");
    f.wallet
        .place_bet(GUILD, 21, Side::Dire, 200, "hater")
        .await
        .expect("bet");

    let report = f.reporter.submit(GUILD, "7000000001").await.expect("submit");

    assert_eq!(report.winning_side, Side::Radiant);
    assert_eq!(report.winners, vec![1, 2, 3, 4, 5]);
    assert_eq!(report.losers, vec![6, 7, 8, 9, 10]);
    assert!(report.unmapped.is_empty());

    assert_eq!(report.rating_changes.len(), 10);
    for change in &report.rating_changes {
        let expected = if change.user_id <= 5 { 50 } else { -50 };
        assert_eq!(change.delta(), expected);
    }
    assert_eq!(f.inhouse.rating_of(GUILD, 1).await.expect("rating"), 1050);
    assert_eq!(f.inhouse.rating_of(GUILD, 10).await.expect("rating"), 950);

    assert_eq!(report.payouts.len(), 1);
    assert_eq!(report.payouts[0].user_id, 20);
    assert_eq!(report.payouts[0].payout, 600);
    assert_eq!(f.wallet.balance(GUILD, 20).await.expect("balance"), 1300);
    assert_eq!(f.wallet.balance(GUILD, 21).await.expect("balance"), 800);

    assert_eq!(report.bets_cleared, 2);
    assert!(f.wallet.open_bets(GUILD).await.expect("bets").is_empty());
}

#[tokio::test]
async fn test_unlinked_players_are_skipped() {
    let f = fixture().await;

    let report = f.reporter.submit(GUILD, " 7000000002 ").await.expect("submit");

    assert_eq!(report.winning_side, Side::Dire);
    assert_eq!(report.winners, vec![6, 7, 8, 9, 10]);
    assert_eq!(report.losers, vec![1, 2, 3, 4]);
    assert_eq!(report.unmapped, vec![9999]);
    assert_eq!(report.rating_changes.len(), 9);
    assert_eq!(f.inhouse.rating_of(GUILD, 5).await.expect("rating"), 1000);
}

#[tokio::test]
async fn test_repeated_submissions_accumulate() {
    let f = fixture().await;

    f.reporter.submit(GUILD, "7000000001").await.expect("first");
    f.reporter.submit(GUILD, "7000000001").await.expect("second");

    assert_eq!(f.inhouse.rating_of(GUILD, 1).await.expect("rating"), 1100);
    let board = f.inhouse.leaderboard(GUILD).await.expect("leaderboard");
    assert_eq!(board.len(), 10);
    assert_eq!(board[0].rating, 1100);
    assert_eq!(board[9].rating, 900);

    // Ratings are per guild
    assert_eq!(f.inhouse.rating_of(GUILD + 1, 1).await.expect("rating"), 1000);
}

#[tokio::test]
async fn test_invalid_submissions_change_nothing() {
    let f = fixture().await;
    f.wallet
        .place_bet(GUILD, 20, Side::Radiant, 100, "fan")
        .await
        .expect("bet");

    assert!(matches!(
        f.reporter.submit(GUILD, "abc").await,
        Err(MatchError::InvalidMatchId(_))
    ));
    assert!(matches!(
        f.reporter.submit(GUILD, "").await,
        Err(MatchError::InvalidMatchId(_))
    ));
    assert!(matches!(
        f.reporter.submit(GUILD, "123").await,
        Err(MatchError::MatchNotFound(123))
    ));

    assert_eq!(f.wallet.open_bets(GUILD).await.expect("bets").len(), 1);
    assert_eq!(f.inhouse.rating_of(GUILD, 1).await.expect("rating"), 1000);
}

#[tokio::test]
async fn test_bet_rules_before_submission() {
    let f = fixture().await;

    let receipt = f
        .wallet
        .place_bet(GUILD, 1, Side::Dire, 400, "player1")
        .await
        .expect("bet");
    assert_eq!(receipt.new_balance, 600);

    let raised = f
        .wallet
        .place_bet(GUILD, 1, Side::Dire, 500, "player1")
        .await
        .expect("raise");
    assert!(raised.updated);
    assert_eq!(raised.previous_amount, 400);
    assert_eq!(raised.new_balance, 500);

    assert!(matches!(
        f.wallet.place_bet(GUILD, 1, Side::Radiant, 600, "player1").await,
        Err(WalletError::SideLocked { existing: Side::Dire })
    ));
    assert!(matches!(
        f.wallet.place_bet(GUILD, 1, Side::Dire, 2000, "player1").await,
        Err(WalletError::InsufficientBalance { .. })
    ));

    let report = f.reporter.submit(GUILD, "7000000002").await.expect("submit");
    assert_eq!(report.payouts[0].payout, 1000);
    assert_eq!(f.wallet.balance(GUILD, 1).await.expect("balance"), 1500);

    // Linked accounts still resolve after the match
    assert_eq!(
        f.ratings.find_user_by_steam_id(1001).await.expect("lookup"),
        Some(1)
    );
}
