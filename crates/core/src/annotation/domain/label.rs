/// Caption drawn next to a detection: class name and confidence to two decimals.
pub fn format_label(class_name: &str, confidence: f32) -> String {
    format!("{class_name} {confidence:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("person", 0.8734, "person 0.87")]
    #[case("person", 0.91, "person 0.91")]
    #[case("person", 1.0, "person 1.00")]
    #[case("traffic light", 0.0, "traffic light 0.00")]
    #[case("class 90", 0.456, "class 90 0.46")]
    fn test_format_label(#[case] name: &str, #[case] confidence: f32, #[case] expected: &str) {
        assert_eq!(format_label(name, confidence), expected);
    }
}
