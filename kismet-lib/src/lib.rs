mod climber;
pub mod compare;
pub mod dice;
pub mod error;
mod evaluator;
pub mod expr;
pub mod group;
pub mod parser;
pub mod roll;
pub mod solver;

#[cfg(test)]
mod tests {
    use crate::error::Error;
    use crate::roll::record::RecordKind;
    use crate::roll::{RollResult, Source};
    use crate::solver::Solver;

    pub struct MockIter<'a, T: Iterator<Item = i64>> {
        pub iter: &'a mut T,
    }

    impl<T: Iterator<Item = i64>> Source for MockIter<'_, T> {
        fn next_in_range(&mut self, min: i64, max: i64) -> i64 {
            match self.iter.next() {
                Some(value) => {
                    if value < min || value > max {
                        panic!("Tried to return {} for a [{}, {}] draw", value, min, max)
                    }
                    value
                }
                None => panic!("Iterator out of values"),
            }
        }
    }

    fn solve_mock(notation: &str, rolls: Vec<i64>) -> RollResult {
        Solver::new(notation)
            .unwrap()
            .solve_with_source(&mut MockIter {
                iter: &mut rolls.into_iter(),
            })
            .unwrap()
    }

    #[test]
    fn one_value_test() {
        let res = Solver::new("20").unwrap().solve().unwrap();
        assert_eq!(20.0, res.total());
        assert!(res.rolls().is_empty());
    }

    #[test]
    fn one_dice_test() {
        let res = solve_mock("d20", vec![8]);
        assert_eq!(8.0, res.total());
        assert_eq!(Some(1), res.rolls()[0].qty);
    }

    #[test]
    fn one_sided_always_one_test() {
        let res = Solver::new("1d1").unwrap().solve().unwrap();
        assert_eq!(1.0, res.total());
    }

    #[test]
    fn counting_roller_test() {
        let res = solve_mock("4d6", vec![3, 3, 3, 3]);
        assert_eq!(12.0, res.total());
        let entries = &res.rolls()[0].entries;
        assert_eq!(4, entries.len());
        assert!(entries.iter().all(|e| e.value() == 3.0 && e.is_used()));
    }

    #[test]
    fn keep_high_test() {
        let res = solve_mock("4d6kh3", vec![1, 2, 3, 4]);
        assert_eq!(9.0, res.total());
        let entries = &res.rolls()[0].entries;
        assert_eq!(4, entries.len());
        assert!(!entries[0].is_used());
        assert_eq!(1.0, entries[0].value());
        assert_eq!(3, entries.iter().filter(|e| e.is_used()).count());
    }

    #[test]
    fn keep_default_end_is_high_test() {
        let res = solve_mock("4d6k3", vec![1, 2, 3, 4]);
        assert_eq!(9.0, res.total());
    }

    #[test]
    fn keep_low_test() {
        let res = solve_mock("4d6kl1", vec![1, 2, 3, 4]);
        assert_eq!(1.0, res.total());
    }

    #[test]
    fn drop_default_end_is_low_test() {
        let res = solve_mock("4d6d1", vec![4, 1, 3, 2]);
        assert_eq!(9.0, res.total());
        let entries = &res.rolls()[0].entries;
        assert!(!entries[1].is_used());
    }

    #[test]
    fn drop_high_test() {
        let res = solve_mock("4d6dh2", vec![4, 1, 3, 2]);
        assert_eq!(3.0, res.total());
    }

    #[test]
    fn keep_then_drop_selects_from_used_test() {
        // kh3 parks the 1, dl1 then drops the lowest of what is left
        let res = solve_mock("4d6kh3dl1", vec![1, 2, 3, 4]);
        assert_eq!(7.0, res.total());
        let entries = &res.rolls()[0].entries;
        assert_eq!(2, entries.iter().filter(|e| e.is_used()).count());
    }

    #[test]
    fn keep_drop_used_count_invariant_test() {
        let res = solve_mock("5d6kh2", vec![2, 6, 3, 6, 1]);
        let entries = &res.rolls()[0].entries;
        assert_eq!(5, entries.len());
        assert_eq!(2, entries.iter().filter(|e| e.is_used()).count());

        let res = solve_mock("5d6dl2", vec![2, 6, 3, 6, 1]);
        let entries = &res.rolls()[0].entries;
        assert_eq!(5, entries.len());
        assert_eq!(3, entries.iter().filter(|e| e.is_used()).count());
    }

    #[test]
    fn reroll_test() {
        let res = solve_mock("2d6r=1", vec![1, 3, 5]);
        assert_eq!(8.0, res.total());
        let entries = &res.rolls()[0].entries;
        assert_eq!(5.0, entries[0].value());
        assert!(entries[0].is_rerolled());
        assert!(!entries[1].is_rerolled());
    }

    #[test]
    fn reroll_once_stops_after_one_draw_test() {
        let res = solve_mock("2d6ro<3", vec![1, 2, 2, 6]);
        assert_eq!(8.0, res.total());
        let entries = &res.rolls()[0].entries;
        assert_eq!(2.0, entries[0].value());
        assert!(entries[0].is_rerolled());
        assert!(entries[1].is_rerolled());
    }

    #[test]
    fn reroll_repeats_until_clear_test() {
        let res = solve_mock("2d6r<3", vec![1, 2, 2, 3, 6]);
        assert_eq!(9.0, res.total());
        let entries = &res.rolls()[0].entries;
        assert_eq!(3.0, entries[0].value());
        assert_eq!(6.0, entries[1].value());
    }

    #[test]
    fn explode_test() {
        let res = solve_mock("2d6!", vec![6, 3, 4]);
        assert_eq!(13.0, res.total());
        let entries = &res.rolls()[0].entries;
        assert_eq!(3, entries.len());
        assert!(entries[0].is_exploded());
        assert_eq!(4.0, entries[1].value());
        assert!(!entries[1].is_exploded());
    }

    #[test]
    fn explode_chains_test() {
        let res = solve_mock("1d6!", vec![6, 6, 2]);
        assert_eq!(14.0, res.total());
        assert_eq!(3, res.rolls()[0].entries.len());
    }

    #[test]
    fn explode_compound_test() {
        let res = solve_mock("2d6!!", vec![6, 3, 6, 2]);
        assert_eq!(17.0, res.total());
        let entries = &res.rolls()[0].entries;
        assert_eq!(2, entries.len());
        assert_eq!(14.0, entries[0].value());
        assert!(entries[0].is_exploded());
    }

    #[test]
    fn explode_penetrate_test() {
        // the comparison sees the raw 6s, the stored values lose one
        let res = solve_mock("2d6!p", vec![6, 3, 6, 2]);
        assert_eq!(15.0, res.total());
        let entries = &res.rolls()[0].entries;
        assert_eq!(4, entries.len());
        assert_eq!(5.0, entries[1].value());
        assert_eq!(1.0, entries[2].value());
    }

    #[test]
    fn explode_with_compare_point_test() {
        let res = solve_mock("2d6!>4", vec![5, 2, 3]);
        assert_eq!(10.0, res.total());
        assert_eq!(3, res.rolls()[0].entries.len());
    }

    #[test]
    fn explode_iteration_cap_test() {
        // a die that always satisfies its own trigger still terminates
        let res = Solver::new("1d1!")
            .unwrap()
            .solve_with_source(&mut MockIter {
                iter: &mut std::iter::repeat(1),
            })
            .unwrap();
        assert_eq!(1001, res.rolls()[0].entries.len());
    }

    #[test]
    fn reroll_iteration_cap_test() {
        let res = Solver::new("1d1r")
            .unwrap()
            .solve_with_source(&mut MockIter {
                iter: &mut std::iter::repeat(1),
            })
            .unwrap();
        assert_eq!(1.0, res.total());
        assert_eq!(1, res.rolls()[0].entries.len());
    }

    #[test]
    fn target_success_and_failure_test() {
        let res = solve_mock("3d6>4f<2", vec![5, 1, 3]);
        assert_eq!(1.0, res.total());
        let entries = &res.rolls()[0].entries;
        assert!(entries[0].is_success());
        assert!(entries[1].is_failure());
        assert!(!entries[2].is_success() && !entries[2].is_failure());
    }

    #[test]
    fn target_counts_successes_test() {
        let res = solve_mock("10d10>7", (1..11).collect());
        assert_eq!(3.0, res.total());
    }

    #[test]
    fn target_counting_invariant_test() {
        let res = solve_mock("6d6>4f<3", vec![5, 6, 1, 2, 4, 3]);
        let record = &res.rolls()[0];
        let successes = record.entries.iter().filter(|e| e.is_success()).count() as i64;
        let failures = record.entries.iter().filter(|e| e.is_failure()).count() as i64;
        assert_eq!((successes - failures) as f64, res.total());
    }

    #[test]
    fn critical_flags_are_cosmetic_test() {
        let res = solve_mock("2d20cs>18cf<2", vec![19, 1]);
        assert_eq!(20.0, res.total());
        let entries = &res.rolls()[0].entries;
        assert!(entries[0].is_crit_success());
        assert!(entries[1].is_crit_fail());
    }

    #[test]
    fn sort_ascending_test() {
        let res = solve_mock("4d6s", vec![3, 1, 4, 2]);
        assert_eq!(10.0, res.total());
        let values: Vec<f64> = res.rolls()[0].entries.iter().map(|e| e.value()).collect();
        assert_eq!(vec![1.0, 2.0, 3.0, 4.0], values);
    }

    #[test]
    fn sort_descending_test() {
        let res = solve_mock("4d6sd", vec![3, 1, 4, 2]);
        let values: Vec<f64> = res.rolls()[0].entries.iter().map(|e| e.value()).collect();
        assert_eq!(vec![4.0, 3.0, 2.0, 1.0], values);
    }

    #[test]
    fn percentile_test() {
        let res = solve_mock("2d%", vec![37, 64]);
        assert_eq!(101.0, res.total());
        assert_eq!(Some(100), res.rolls()[0].sides);
    }

    #[test]
    fn fudge_test() {
        let res = solve_mock("4dF", vec![1, 3, 5, 6]);
        assert_eq!(1.0, res.total());
        let record = &res.rolls()[0];
        assert_eq!(Some(-1), record.min);
        assert_eq!(Some(1), record.max);
        let values: Vec<f64> = record.entries.iter().map(|e| e.value()).collect();
        assert_eq!(vec![-1.0, 0.0, 1.0, 1.0], values);
    }

    #[test]
    fn fudge_variant_test() {
        let res = solve_mock("4dF.1", vec![1, 2, 3, 4]);
        assert_eq!(0.0, res.total());
        let values: Vec<f64> = res.rolls()[0].entries.iter().map(|e| e.value()).collect();
        assert_eq!(vec![-1.0, 0.0, 0.0, 1.0], values);
    }

    #[test]
    fn group_keep_spans_sub_expressions_test() {
        let res = solve_mock("{2d20, 1d4}kh1", vec![15, 7, 3]);
        assert_eq!(15.0, res.total());
        let record = &res.rolls()[0];
        assert_eq!(RecordKind::Group, record.kind);
        assert_eq!(3, record.entries.len());
        assert_eq!(1, record.entries.iter().filter(|e| e.is_used()).count());
        assert_eq!(Some(1), record.min);
        assert_eq!(Some(20), record.max);
    }

    #[test]
    fn group_arithmetic_becomes_synthetic_entry_test() {
        let res = solve_mock("{3 + 2, 1d6}kh1", vec![4]);
        assert_eq!(5.0, res.total());
        let record = res.rolls().last().unwrap();
        assert_eq!(2, record.entries.len());
        assert_eq!(5.0, record.entries[0].value());
    }

    #[test]
    fn nested_group_flattens_test() {
        let res = solve_mock("{{1d6, 1d8}, 1d4}kh2", vec![5, 7, 2]);
        assert_eq!(12.0, res.total());
        let record = &res.rolls()[0];
        assert_eq!(3, record.entries.len());
        assert_eq!(Some(8), record.max);
    }

    #[test]
    fn dice_and_arithmetic_test() {
        let res = solve_mock("3d6 + 2", vec![1, 2, 3]);
        assert_eq!(8.0, res.total());
    }

    #[test]
    fn precedence_test() {
        let res = Solver::new("2 + 3 * 4").unwrap().solve().unwrap();
        assert_eq!(14.0, res.total());
    }

    #[test]
    fn power_binds_tightest_and_right_test() {
        let res = Solver::new("2 ^ 3 ^ 2").unwrap().solve().unwrap();
        assert_eq!(512.0, res.total());
        let res = Solver::new("2 * 2 ** 3").unwrap().solve().unwrap();
        assert_eq!(16.0, res.total());
    }

    #[test]
    fn remainder_test() {
        let res = Solver::new("7 % 3").unwrap().solve().unwrap();
        assert_eq!(1.0, res.total());
    }

    #[test]
    fn float_division_test() {
        let res = Solver::new("10 / 4").unwrap().solve().unwrap();
        assert_eq!(2.5, res.total());
    }

    #[test]
    fn float_mul_test() {
        let res = Solver::new("20 * 1.5").unwrap().solve().unwrap();
        assert_eq!(30.0, res.total());
    }

    #[test]
    fn float_signed_add_test() {
        let res = Solver::new("20 + -1.5").unwrap().solve().unwrap();
        assert_eq!(18.5, res.total());
    }

    #[test]
    fn divide_by_zero_test() {
        let err = Solver::new("1 / 0").unwrap().solve().unwrap_err();
        assert!(matches!(err, Error::Evaluation(_)));
    }

    #[test]
    fn functions_test() {
        for (notation, expected) in [
            ("floor(7 / 2)", 3.0),
            ("ceil(1 / 2)", 1.0),
            ("round(7 / 3)", 2.0),
            ("abs(2 - 5)", 3.0),
            ("sqrt(16)", 4.0),
            ("pow(2, 5)", 32.0),
            ("max(4, 6)", 6.0),
            ("min(4, 6)", 4.0),
            ("sign(0 - 3)", -1.0),
            ("exp(0)", 1.0),
            ("cos(0)", 1.0),
            ("sin(0)", 0.0),
            ("tan(0)", 0.0),
        ] {
            let res = Solver::new(notation).unwrap().solve().unwrap();
            assert_eq!(expected, res.total(), "{notation}");
        }
        let res = Solver::new("log(exp(1))").unwrap().solve().unwrap();
        assert!((res.total() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn function_arity_is_checked_test() {
        assert!(matches!(
            Solver::new("pow(2)").unwrap_err(),
            Error::Parse(_)
        ));
        assert!(matches!(
            Solver::new("abs(1, 2)").unwrap_err(),
            Error::Parse(_)
        ));
    }

    #[test]
    fn function_over_dice_test() {
        let res = solve_mock("max(1d6, 4)", vec![2]);
        assert_eq!(4.0, res.total());
    }

    #[test]
    fn quantity_sub_expression_test() {
        let res = solve_mock("(2 + 2)d6", vec![1, 1, 1, 1]);
        assert_eq!(4.0, res.total());
        assert_eq!(4, res.rolls()[0].entries.len());
    }

    #[test]
    fn sides_sub_expression_test() {
        let res = solve_mock("2d(3 * 4)", vec![12, 1]);
        assert_eq!(13.0, res.total());
        assert_eq!(Some(12), res.rolls()[0].sides);
    }

    #[test]
    fn dice_inside_quantity_rejected_test() {
        assert!(matches!(
            Solver::new("(1d4)d6").unwrap_err(),
            Error::Configuration(_)
        ));
    }

    #[test]
    fn zero_quantity_rejected_test() {
        assert!(matches!(
            Solver::new("0d6").unwrap_err(),
            Error::Configuration(_)
        ));
    }

    #[test]
    fn zero_sides_rejected_test() {
        assert!(matches!(
            Solver::new("3d0").unwrap_err(),
            Error::Configuration(_)
        ));
    }

    #[test]
    fn limits_test() {
        assert!(matches!(
            Solver::new("5001d6").unwrap_err(),
            Error::Configuration(_)
        ));
        assert!(matches!(
            Solver::new("1d5001").unwrap_err(),
            Error::Configuration(_)
        ));
    }

    #[test]
    fn parse_error_test() {
        for notation in ["", "4x6", "4d", "4d6 foo", "{2d6", "4d6kh"] {
            assert!(
                matches!(Solver::new(notation), Err(Error::Parse(_))),
                "`{notation}` should not parse"
            );
        }
    }

    #[test]
    fn modifier_priority_independent_of_notation_test() {
        let rolls = vec![6, 1, 2, 3, 4];
        let left = solve_mock("4d6kh3!", rolls.clone());
        let right = solve_mock("4d6!kh3", rolls);
        assert_eq!(13.0, left.total());
        assert_eq!(left.total(), right.total());
        assert_eq!(
            left.rolls()[0].modifiers,
            right.rolls()[0].modifiers
        );
    }

    #[test]
    fn modifier_dedup_by_name_test() {
        let solver = Solver::new("4d6kh3kl2").unwrap();
        let dice = solver.dice();
        assert_eq!(1, dice[0].modifiers().len());
    }

    #[test]
    fn parse_is_deterministic_test() {
        let left = Solver::new("4d6!!p>4kh3").unwrap();
        let right = Solver::new("4d6!!p>4kh3").unwrap();
        assert_eq!(left.expression(), right.expression());
    }

    #[test]
    fn entity_notation_roundtrips_test() {
        for notation in ["4d6!!p>4kh3", "2d%r<10", "4dF.1s", "10d10>7f<2"] {
            let solver = Solver::new(notation).unwrap();
            let reparsed = Solver::new(solver.dice()[0].notation()).unwrap();
            assert_eq!(solver.dice()[0], reparsed.dice()[0], "{notation}");
        }
    }

    #[test]
    fn reason_test() {
        let res = solve_mock("2d6 + 1 : attack roll", vec![3, 4]);
        assert_eq!(8.0, res.total());
        assert_eq!(Some("attack roll"), res.reason());
    }

    #[test]
    fn dice_accessor_test() {
        let solver = Solver::new("2d6 + 1d4").unwrap();
        let dice = solver.dice();
        assert_eq!(2, dice.len());
        assert_eq!("2d6", dice[0].notation());
        assert_eq!("1d4", dice[1].notation());
    }

    #[test]
    fn display_test() {
        let res = solve_mock("4d6kh3", vec![1, 2, 3, 4]);
        let text = res.to_string();
        assert!(text.contains("= **9**"), "{text}");
        assert!(text.contains("1d"), "{text}");
    }
}
