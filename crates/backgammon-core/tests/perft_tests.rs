use backgammon_core::perft::perft_root;

#[test]
fn test_perft() {
    assert_eq!(perft_root(1), 447);
    assert_eq!(perft_root(2), 202_782);
}
