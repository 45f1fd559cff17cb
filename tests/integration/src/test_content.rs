//! Content text, inline coalescing, and whitespace preservation tests.

#[cfg(test)]
mod tests {
    use markwright_core::MarkupConfig;
    use markwright_model::{DynamicObject, PropertyDescriptor, Value, builtin};

    use crate::{
        PRESENTATION, bold_of, button, button_with, line_break, paragraph_of, property, run,
        run_of, stack_panel_of, text_block_of, write, write_with,
    };

    #[test]
    fn test_should_coalesce_adjacent_strings() {
        let value = paragraph_of(vec!["Hello ".into(), "world".into()]);
        assert_eq!(
            write(&value),
            format!(r#"<Paragraph xmlns="{PRESENTATION}">Hello world</Paragraph>"#)
        );
    }

    #[test]
    fn test_should_interleave_text_and_inline_elements() {
        let value = paragraph_of(vec![
            "Hello ".into(),
            bold_of(vec!["big".into()]),
            " world".into(),
        ]);
        let xml = write(&value);
        assert_eq!(
            xml,
            format!(r#"<Paragraph xmlns="{PRESENTATION}">Hello <Bold>big</Bold> world</Paragraph>"#)
        );
        assert!(!xml.contains("xml:space"));
    }

    #[test]
    fn test_should_unwrap_plain_runs_into_text() {
        let value = paragraph_of(vec![run_of("Hello"), " there".into()]);
        assert_eq!(
            write(&value),
            format!(r#"<Paragraph xmlns="{PRESENTATION}">Hello there</Paragraph>"#)
        );
    }

    #[test]
    fn test_should_keep_runs_with_extra_properties() {
        let styled = DynamicObject::new(run())
            .with(property("Text", builtin::string()), "Hi")
            .with(property("FontWeight", builtin::string()), "Bold")
            .into_value();
        assert_eq!(
            write(&paragraph_of(vec![styled])),
            format!(r#"<Paragraph xmlns="{PRESENTATION}"><Run FontWeight="Bold">Hi</Run></Paragraph>"#)
        );
    }

    #[test]
    fn test_should_preserve_space_next_to_trimming_element() {
        let value = paragraph_of(vec![
            "Hello ".into(),
            DynamicObject::new(line_break()).into_value(),
        ]);
        assert_eq!(
            write(&value),
            format!(
                r#"<Paragraph xml:space="preserve" xmlns="{PRESENTATION}">Hello <LineBreak/></Paragraph>"#
            )
        );
    }

    #[test]
    fn test_should_mark_only_text_that_normalization_would_change() {
        for text in ["two  spaces", "\tindented", " leading", "trailing ", "line\nbreak"] {
            let xml = write(&text_block_of(text));
            assert!(xml.contains(r#"xml:space="preserve""#), "{text:?} => {xml}");
        }
        let xml = write(&text_block_of("plain words"));
        assert!(!xml.contains("xml:space"), "{xml}");
    }

    #[test]
    fn test_should_not_repeat_preservation_inside_preserving_subtree() {
        let value = paragraph_of(vec!["Hello  ".into(), bold_of(vec!["  x".into()])]);
        let xml = write(&value);
        assert_eq!(
            xml,
            format!(
                r#"<Paragraph xml:space="preserve" xmlns="{PRESENTATION}">Hello  <Bold>  x</Bold></Paragraph>"#
            )
        );
        assert_eq!(xml.matches("xml:space").count(), 1);
    }

    #[test]
    fn test_should_suppress_indentation_inside_mixed_content() {
        let panel = stack_panel_of(vec![paragraph_of(vec![
            "Hello ".into(),
            bold_of(vec!["big".into()]),
        ])]);
        assert_eq!(
            write_with(MarkupConfig::indented(), &panel.into_value()),
            format!(
                "<StackPanel xmlns=\"{PRESENTATION}\">\n  <Paragraph>Hello <Bold>big</Bold></Paragraph>\n</StackPanel>"
            )
        );
    }

    #[test]
    fn test_should_escape_markup_characters_in_text() {
        assert_eq!(
            write(&text_block_of("a < b & c")),
            format!(r#"<TextBlock xmlns="{PRESENTATION}">a &lt; b &amp; c</TextBlock>"#)
        );
    }

    #[test]
    fn test_should_write_object_content_as_child_element() {
        let value = button_with(text_block_of("Hi")).into_value();
        assert_eq!(
            write(&value),
            format!(r#"<Button xmlns="{PRESENTATION}"><TextBlock>Hi</TextBlock></Button>"#)
        );
    }

    #[test]
    fn test_should_write_null_content_as_null_extension() {
        let caption = PropertyDescriptor::builder()
            .name("Content")
            .property_type(builtin::object())
            .default_value(Value::from("Click"))
            .build();
        let value = DynamicObject::new(button())
            .with(caption, Value::Null)
            .into_value();
        let xml = write(&value);
        assert!(xml.contains("<x:Null/>"), "{xml}");
    }
}
