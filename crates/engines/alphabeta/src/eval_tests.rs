use super::*;
use schach_core::START_DIAGRAM;

fn board(diagram: &str) -> Board {
    Board::from_diagram(diagram).unwrap()
}

#[test]
fn test_startpos_is_balanced() {
    let b = board(START_DIAGRAM);
    assert_eq!(evaluate(&b, Color::White), 0);
    assert_eq!(evaluate(&b, Color::Black), 0);
}

#[test]
fn test_negation_and_color_flip() {
    let b = board("r3k4/pp2p1p2/2n6/4P4/3b5/5N3/PPP2PPPP/9/2A1K2CR");
    let white = evaluate(&b, Color::White);
    assert_eq!(white, -evaluate(&b, Color::Black));
    assert_eq!(white, evaluate(&b.color_flip(), Color::Black));
}

#[test]
fn test_material_dominates() {
    let up_a_rook = board("4k4/9/9/9/9/9/9/9/R3K4");
    assert!(evaluate(&up_a_rook, Color::White) > 400);
    assert!(evaluate(&up_a_rook, Color::Black) < -400);
}

#[test]
fn test_missing_king_is_finite() {
    let b = board("9/9/9/9/9/9/9/9/4K4");
    let score = evaluate(&b, Color::White);
    assert!(score > 10_000);
    assert!(score < 30_000);
}

#[test]
fn test_king_danger_grows_with_attackers() {
    let base = board("k8/9/9/9/9/9/9/9/4K4");
    let one = board("k8/9/9/9/9/3n5/9/9/4K4");
    let two = board("k8/9/9/9/5r3/3n5/9/9/4K4");

    assert_eq!(king_danger(&base, Color::White), 0);
    assert!(king_danger(&one, Color::White) > 0);
    assert!(king_danger(&two, Color::White) > king_danger(&one, Color::White));

    assert!(evaluate(&one, Color::White) < evaluate(&base, Color::White));
    assert!(evaluate(&two, Color::White) < evaluate(&one, Color::White));
}

#[test]
fn test_heavier_attacker_is_more_dangerous() {
    let rook = board("k8/9/9/9/5r3/9/9/9/4K4");
    let angel = board("k8/9/9/9/5e3/9/9/9/4K4");
    assert!(king_danger(&angel, Color::White) > king_danger(&rook, Color::White));
}

#[test]
fn test_knight_near_king_scores_worse_than_far() {
    let near = board("k8/9/9/9/9/3n5/9/9/4K4");
    let far = board("k7n/9/9/9/9/9/9/9/4K4");
    assert!(evaluate(&near, Color::White) < evaluate(&far, Color::White));
}

#[test]
fn test_passed_pawn_bonus() {
    assert_eq!(passed_pawn_bonus(0, false), 0);
    assert_eq!(passed_pawn_bonus(4, false), 80);
    assert_eq!(passed_pawn_bonus(4, true), 104);
    assert!(passed_pawn_bonus(5, false) > passed_pawn_bonus(4, true));
}

#[test]
fn test_supported_passer_beats_lone_passer() {
    let supported = board("8k/9/9/9/4P4/3P5/9/9/K8");
    let lone = board("8k/9/9/9/4P4/9/9/9/K8");
    let gain = evaluate(&supported, Color::White) - evaluate(&lone, Color::White);
    assert!(gain > piece_value(PieceKind::Pawn), "gain was {gain}");
}

#[test]
fn test_blocked_pawn_is_not_passed() {
    let blocked = board("8k/9/3p5/9/4P4/9/9/9/K8");
    let aside = board("8k/9/p8/9/4P4/9/9/9/K8");
    assert!(evaluate(&aside, Color::White) > evaluate(&blocked, Color::White));
}

#[test]
fn test_personality_keeps_symmetry() {
    let b = board("r3k4/pp2p1p2/2n6/4P4/3b5/5N3/PPP2PPPP/9/2A1K2CR");
    for personality in Personality::ALL {
        let weights = personality.weights();
        let white = evaluate_with(&b, Color::White, &weights);
        assert_eq!(white, -evaluate_with(&b, Color::Black, &weights), "{personality:?}");
        assert_eq!(white, evaluate_with(&b.color_flip(), Color::Black, &weights));
    }
    assert_eq!(
        evaluate_with(&b, Color::White, &Personality::Normal.weights()),
        evaluate(&b, Color::White)
    );
}

#[test]
fn test_aggressive_rewards_active_pieces() {
    let b = board("4k4/9/9/9/4N4/9/9/9/4K4");
    let normal = evaluate(&b, Color::White);
    assert!(evaluate_with(&b, Color::White, &Personality::Aggressive.weights()) > normal);
    assert!(evaluate_with(&b, Color::White, &Personality::Gentle.weights()) < normal);
}

#[test]
fn test_solid_rewards_pawn_structure() {
    // Linked, blocked pawns against an isolated one.
    let b = board("4k4/4p4/9/9/9/9/4P4/3P5/4K4");
    let normal = evaluate(&b, Color::White);
    assert!(evaluate_with(&b, Color::White, &Personality::Solid.weights()) > normal);
    assert!(evaluate_with(&b, Color::White, &Personality::Aggressive.weights()) < normal);
}

#[test]
fn test_king_safety_weight_scales_danger() {
    let b = board("4k4/9/9/9/9/9/2n6/9/4K4");
    assert!(king_danger(&b, Color::White) > 0);
    let careful = EvalWeights {
        king_safety: 140,
        ..EvalWeights::default()
    };
    assert!(evaluate_with(&b, Color::White, &careful) < evaluate(&b, Color::White));
}

#[test]
fn test_personality_names() {
    assert_eq!("SOLID".parse::<Personality>(), Ok(Personality::Solid));
    assert_eq!(Personality::default(), Personality::Normal);
    assert!("reckless".parse::<Personality>().is_err());
}
