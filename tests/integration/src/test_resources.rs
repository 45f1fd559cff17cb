//! Keyed dictionary content tests.

#[cfg(test)]
mod tests {
    use markwright_core::XAML_NAMESPACE;
    use markwright_model::{DynamicObject, Value};

    use crate::{
        PRESENTATION, button_with, contents_property, resource_dictionary, resources_of,
        stack_panel_of, write,
    };

    const SYSTEM: &str = "clr-namespace:System;assembly=mscorlib";

    #[test]
    fn test_should_write_resources_sorted_by_key() {
        let panel = stack_panel_of(Vec::new()).with(
            contents_property("Resources", resource_dictionary()),
            resources_of(vec![("b", "Second".into()), ("a", "First".into())]),
        );
        assert_eq!(
            write(&panel.into_value()),
            format!(
                concat!(
                    r#"<StackPanel xmlns="{p}" xmlns:s="{s}" xmlns:x="{x}">"#,
                    "<StackPanel.Resources>",
                    r#"<s:String x:Key="a">First</s:String>"#,
                    r#"<s:String x:Key="b">Second</s:String>"#,
                    "</StackPanel.Resources>",
                    "</StackPanel>"
                ),
                p = PRESENTATION,
                s = SYSTEM,
                x = XAML_NAMESPACE
            )
        );
    }

    #[test]
    fn test_should_write_keyed_objects_at_root() {
        let value = resources_of(vec![("primary", button_with("OK").into_value())]);
        assert_eq!(
            write(&value),
            format!(
                r#"<ResourceDictionary xmlns="{PRESENTATION}" xmlns:x="{XAML_NAMESPACE}"><Button x:Key="primary">OK</Button></ResourceDictionary>"#
            )
        );
    }

    #[test]
    fn test_should_ignore_insertion_order_of_entries() {
        let forward = resources_of(vec![
            ("a", "1".into()),
            ("b", "2".into()),
            ("c", "3".into()),
        ]);
        let backward = resources_of(vec![
            ("c", "3".into()),
            ("b", "2".into()),
            ("a", "1".into()),
        ]);
        assert_eq!(write(&forward), write(&backward));
    }

    #[test]
    fn test_should_sort_keys_by_text_form() {
        let value = DynamicObject::new(resource_dictionary())
            .with_entry(9, "nine")
            .with_entry(10, "ten")
            .into_value();
        let xml = write(&value);
        let ten = xml.find(r#"x:Key="10""#).expect("key 10");
        let nine = xml.find(r#"x:Key="9""#).expect("key 9");
        assert!(ten < nine, "{xml}");
    }

    #[test]
    fn test_should_write_null_entries_as_keyed_null_extension() {
        let value = resources_of(vec![("empty", Value::Null)]);
        assert!(write(&value).contains(r#"<x:Null x:Key="empty"/>"#));
    }
}
