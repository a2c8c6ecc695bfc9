//! Deterministic parameter ordering.
//!
//! Positional arguments are assigned by index after a stable partition:
//! required ones first, then optional ones, each group in declaration order.
//! Flags and environment variables are processed in lexicographic name
//! order, which `Command` gets from its `BTreeMap`s.

use crate::param::Param;

/// Stable partition of `args` into required-then-optional.
///
/// `is_required` decides membership so callers can use either the declared
/// constraints (help output) or the ones in effect for a run (parsing).
pub fn required_first<'a, F>(args: &'a [Param], is_required: F) -> Vec<&'a Param>
where
    F: Fn(&Param) -> bool,
{
    let (required, optional): (Vec<&Param>, Vec<&Param>) =
        args.iter().partition(|arg| is_required(arg));
    required.into_iter().chain(optional).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Constraints;

    fn names(params: Vec<&Param>) -> Vec<&str> {
        params.into_iter().map(Param::name).collect()
    }

    #[test]
    fn required_args_move_to_front() {
        let args = vec![Param::new("opt1"), Param::new("req1").required()];
        let sorted = required_first(&args, |a| a.get_constraints().is_required());
        assert_eq!(names(sorted), vec!["req1", "opt1"]);
    }

    #[test]
    fn partition_is_stable() {
        let args = vec![
            Param::new("o1"),
            Param::new("r1").required(),
            Param::new("o2"),
            Param::new("r2").constraints(Constraints::REQUIRED | Constraints::MUST_EXIST),
            Param::new("o3"),
        ];
        let sorted = required_first(&args, |a| a.get_constraints().is_required());
        assert_eq!(names(sorted), vec!["r1", "r2", "o1", "o2", "o3"]);
    }

    #[test]
    fn predicate_decides_membership() {
        let args = vec![Param::new("a"), Param::new("b")];
        let sorted = required_first(&args, |a| a.name() == "b");
        assert_eq!(names(sorted), vec!["b", "a"]);
    }

    #[test]
    fn empty_input() {
        let sorted = required_first(&[], |_| true);
        assert!(sorted.is_empty());
    }
}
