use holdem_engine::{card, evaluate, Card, EvalError, HandCategory, Rank};
use itertools::Itertools;
use rstest::rstest;

fn cards(codes: &str) -> Vec<Card> {
    codes.split_whitespace().map(card).collect()
}

#[rstest]
#[case("AS KS QS JS TS", HandCategory::StraightFlush)]
#[case("9H 8H 7H 6H 5H", HandCategory::StraightFlush)]
#[case("9C 9D 9H 9S 2C", HandCategory::FourOfAKind)]
#[case("KC KD KH 2S 2C", HandCategory::FullHouse)]
#[case("AH QH 9H 5H 2H", HandCategory::Flush)]
#[case("TC 9D 8H 7S 6C", HandCategory::Straight)]
#[case("7C 7D 7H KS 2C", HandCategory::ThreeOfAKind)]
#[case("QC QD 2H 2S 9C", HandCategory::TwoPair)]
#[case("KC KD 8H 5S 2C", HandCategory::OnePair)]
#[case("AC JD 8H 5S 2C", HandCategory::HighCard)]
fn five_card_categories(#[case] hand: &str, #[case] expected: HandCategory) {
    let rank = evaluate(&cards(hand)).unwrap();
    assert_eq!(rank.category, expected);
}

#[test]
fn category_order_is_total() {
    // Witnesses from weakest to strongest category.
    let chain = [
        "AC JD 8H 5S 2C",
        "KC KD 8H 5S 2C",
        "QC QD 2H 2S 9C",
        "7C 7D 7H KS 2C",
        "TC 9D 8H 7S 6C",
        "AH QH 9H 5H 2H",
        "KC KD KH 2S 2C",
        "9C 9D 9H 9S 2C",
        "AS KS QS JS TS",
    ];
    for pair in chain.windows(2) {
        let weaker = evaluate(&cards(pair[0])).unwrap();
        let stronger = evaluate(&cards(pair[1])).unwrap();
        assert!(weaker < stronger, "{} should lose to {}", pair[0], pair[1]);
    }
}

#[test]
fn evaluation_ignores_card_order() {
    let hand = cards("QC QD 2H 2S 9C");
    let reference = evaluate(&hand).unwrap();
    for permutation in hand.iter().copied().permutations(5) {
        assert_eq!(evaluate(&permutation).unwrap(), reference);
    }
}

#[test]
fn wheel_is_a_five_high_straight() {
    let wheel = evaluate(&cards("AS 2C 3D 4H 5S")).unwrap();
    assert_eq!(wheel.category, HandCategory::Straight);
    assert_eq!(wheel.tiebreaks[0], Rank::Five);

    let six_high = evaluate(&cards("2C 3D 4H 5S 6C")).unwrap();
    assert!(wheel < six_high);
}

#[test]
fn steel_wheel_is_a_five_high_straight_flush() {
    let wheel = evaluate(&cards("AH 2H 3H 4H 5H")).unwrap();
    assert_eq!(wheel.category, HandCategory::StraightFlush);
    assert_eq!(wheel.tiebreaks[0], Rank::Five);
}

#[test]
fn ace_does_not_wrap_around() {
    let rank = evaluate(&cards("QC KD AH 2S 3C")).unwrap();
    assert_eq!(rank.category, HandCategory::HighCard);
}

#[test]
fn kickers_break_ties_lexicographically() {
    let better = evaluate(&cards("AC KD QH 7S 3C")).unwrap();
    let worse = evaluate(&cards("AS KH QC 7D 2S")).unwrap();
    assert!(better > worse);

    let split = evaluate(&cards("AH KC QD 7C 3H")).unwrap();
    assert_eq!(better, split);
}

#[test]
fn seven_cards_pick_the_best_five() {
    // Hole pair plus a board flush: the flush must win out.
    let rank = evaluate(&cards("9C 9D AH QH 8H 5H 2H")).unwrap();
    assert_eq!(rank.category, HandCategory::Flush);
    assert_eq!(rank.tiebreaks[0], Rank::Ace);

    // Board two pair upgraded by a hole king into a full house.
    let rank = evaluate(&cards("KC KD 2H 2S KH 9C 5D")).unwrap();
    assert_eq!(rank.category, HandCategory::FullHouse);
}

#[test]
fn six_cards_pick_the_best_five() {
    let rank = evaluate(&cards("TC 9D 8H 7S 6C 6D")).unwrap();
    assert_eq!(rank.category, HandCategory::Straight);
    assert_eq!(rank.tiebreaks[0], Rank::Ten);
}

#[rstest]
#[case(0)]
#[case(4)]
#[case(8)]
fn wrong_card_counts_are_rejected(#[case] n: usize) {
    let deck = cards("AS KS QS JS TS 9S 8S 7S");
    assert_eq!(evaluate(&deck[..n]), Err(EvalError::WrongCardCount(n)));
}

#[rstest]
#[case("AH QH 9H 5H 2H", "Flush (Ace high)")]
#[case("KC KD 8H 5S 2C", "Pair of Kings")]
#[case("QC QD 2H 2S 9C", "Two Pair (Queens and Twos)")]
#[case("KC KD KH 2S 2C", "Full House (Kings over Twos)")]
#[case("AS 2C 3D 4H 5S", "Straight (Five high)")]
#[case("9C 9D 9H 9S 2C", "Four of a Kind (Nines)")]
#[case("AC JD 8H 5S 2C", "High Card (Ace)")]
fn descriptions_read_naturally(#[case] hand: &str, #[case] expected: &str) {
    assert_eq!(evaluate(&cards(hand)).unwrap().describe(), expected);
}
