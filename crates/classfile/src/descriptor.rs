/// Counts the parameters of a JVM method descriptor, e.g. `(II[I)I` has 3.
///
/// Only the parameter list matters to the interpreter (to know how many
/// stack slots to pop for `invokestatic`); the return type after `)` is
/// never inspected, so this stops at the closing paren.
pub fn count_parameters(descriptor: &str) -> usize {
    let params = descriptor
        .strip_prefix('(')
        .and_then(|rest| rest.split(')').next())
        .unwrap_or("");

    let mut count = 0;
    let mut chars = params.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '[' => continue, // array dimension prefix, doesn't count as its own parameter
            'L' => {
                while chars.next_if(|&c| c != ';').is_some() {}
                chars.next(); // consume ';'
                count += 1;
            }
            _ => count += 1,
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_counts_primitive_parameters() {
        assert_eq!(count_parameters("(II)I"), 2);
        assert_eq!(count_parameters("()V"), 0);
        assert_eq!(count_parameters("(I)V"), 1);
    }

    #[test]
    fn test_counts_array_parameter_as_one() {
        assert_eq!(count_parameters("([I)V"), 1);
        assert_eq!(count_parameters("([Ljava/lang/String;)V"), 1);
    }

    #[test]
    fn test_counts_object_reference_as_one() {
        assert_eq!(count_parameters("(Ljava/lang/String;I)V"), 2);
    }
}
