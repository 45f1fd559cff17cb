//! Whole-document serialization tests.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use markwright_core::MarkupConfig;
    use markwright_model::{
        ConvertError, DynamicObject, ModuleInfo, PropertyDescriptor, SerializationManager,
        TypeInfo, TypeRef, TypeVisibility, Value, ValueSerializer, builtin,
    };
    use markwright_xml::{MarkupError, MarkupWriter, markup_object_for, to_markup};

    use crate::{
        assert_namespace_closure, button_with, framework, grid_of, grid_row, property,
        stack_panel_of, write, write_with,
    };

    fn widgets_type(name: &str) -> TypeRef {
        TypeInfo::builder()
            .name(name)
            .namespace("Acme.Widgets")
            .module(ModuleInfo::new("Widgets").into_ref())
            .build()
            .into_ref()
    }

    const WIDGETS: &str = "clr-namespace:Acme.Widgets;assembly=Widgets";

    #[test]
    fn test_should_write_panel_of_buttons() {
        let panel = stack_panel_of(vec![
            button_with("OK").into_value(),
            button_with("Cancel").into_value(),
        ]);
        assert_eq!(
            write(&panel.into_value()),
            format!(
                r#"<StackPanel xmlns="{}"><Button>OK</Button><Button>Cancel</Button></StackPanel>"#,
                crate::PRESENTATION
            )
        );
    }

    #[test]
    fn test_should_write_attached_property_with_owner_prefix() {
        let placed = button_with("OK").with(grid_row(), 1);
        let unplaced = button_with("Next").with(grid_row(), 0);
        let value = grid_of(vec![placed.into_value(), unplaced.into_value()]).into_value();
        assert_eq!(
            write(&value),
            format!(
                r#"<Grid xmlns="{}"><Button Grid.Row="1">OK</Button><Button>Next</Button></Grid>"#,
                crate::PRESENTATION
            )
        );
    }

    #[test]
    fn test_should_hoist_foreign_namespace_to_root() {
        let inner = stack_panel_of(vec![DynamicObject::new(widgets_type("Gauge")).into_value()]);
        let outer = stack_panel_of(vec![inner.into_value()]);
        let xml = write(&outer.into_value());
        assert_eq!(
            xml,
            format!(
                r#"<StackPanel xmlns="{}" xmlns:aw="{WIDGETS}"><StackPanel><aw:Gauge/></StackPanel></StackPanel>"#,
                crate::PRESENTATION
            )
        );
        assert_eq!(xml.matches("xmlns:aw").count(), 1);
    }

    #[test]
    fn test_should_disambiguate_colliding_prefixes() {
        let typed = |uri: &str, namespace: &str, name: &str| {
            let module = ModuleInfo::new(namespace)
                .with_definition(uri, namespace)
                .with_prefix(uri, "w")
                .into_ref();
            DynamicObject::new(
                TypeInfo::builder()
                    .name(name)
                    .namespace(namespace)
                    .module(module)
                    .build()
                    .into_ref(),
            )
            .into_value()
        };
        let panel = stack_panel_of(vec![
            typed("urn:one", "One", "Dial"),
            typed("urn:two", "Two", "Knob"),
        ]);
        assert_eq!(
            write(&panel.into_value()),
            format!(
                r#"<StackPanel xmlns="{}" xmlns:w="urn:one" xmlns:w1="urn:two"><w:Dial/><w1:Knob/></StackPanel>"#,
                crate::PRESENTATION
            )
        );
    }

    #[test]
    fn test_should_produce_identical_output_for_same_graph() {
        let panel = stack_panel_of(vec![
            button_with("OK").with(grid_row(), 2).into_value(),
            DynamicObject::new(widgets_type("Gauge")).into_value(),
        ])
        .into_value();
        assert_eq!(write(&panel), write(&panel));
    }

    #[test]
    fn test_should_indent_nested_elements() {
        let panel = stack_panel_of(vec![
            button_with("OK").into_value(),
            button_with("Cancel").into_value(),
        ]);
        assert_eq!(
            write_with(MarkupConfig::indented(), &panel.into_value()),
            format!(
                "<StackPanel xmlns=\"{}\">\n  <Button>OK</Button>\n  <Button>Cancel</Button>\n</StackPanel>",
                crate::PRESENTATION
            )
        );
    }

    #[derive(Debug)]
    struct ThicknessSerializer;

    impl ValueSerializer for ThicknessSerializer {
        fn can_convert_to_string(&self, value: &Value) -> bool {
            value
                .as_object()
                .is_some_and(|o| o.type_info().name == "Thickness")
        }

        fn convert_to_string(&self, value: &Value) -> Result<String, ConvertError> {
            Ok(value.text())
        }
    }

    #[derive(Debug)]
    struct ThicknessManager;

    impl SerializationManager for ThicknessManager {
        fn value_serializer_for(&self, ty: &TypeInfo) -> Option<Arc<dyn ValueSerializer>> {
            if ty.name == "Thickness" {
                Some(Arc::new(ThicknessSerializer))
            } else {
                ty.value_serializer.clone()
            }
        }
    }

    #[test]
    fn test_should_resolve_serializers_through_manager() {
        let thickness = TypeInfo::builder()
            .name("Thickness")
            .namespace("System.Windows")
            .module(framework())
            .build()
            .into_ref();
        let margin = DynamicObject::new(thickness.clone())
            .with_text("1,2,3,4")
            .into_value();
        let value = button_with("OK")
            .with(property("Margin", thickness), margin)
            .into_value();

        let xml = MarkupWriter::with_manager(MarkupConfig::default(), Arc::new(ThicknessManager))
            .write_to_string(&value)
            .expect("markup");
        assert_namespace_closure(&xml);
        assert_eq!(
            xml,
            format!(
                r#"<Button Margin="1,2,3,4" xmlns="{}">OK</Button>"#,
                crate::PRESENTATION
            )
        );

        let fallback = write(&value);
        assert!(fallback.contains("<Button.Margin><sw:Thickness/></Button.Margin>"), "{fallback}");
    }

    #[derive(Debug)]
    struct TypeNameSerializer {
        target: TypeRef,
    }

    impl ValueSerializer for TypeNameSerializer {
        fn can_convert_to_string(&self, value: &Value) -> bool {
            value.is_string()
        }

        fn convert_to_string(&self, value: &Value) -> Result<String, ConvertError> {
            Ok(format!("aw:{}", value.text()))
        }

        fn type_references(&self, _value: &Value) -> Vec<TypeRef> {
            vec![self.target.clone()]
        }
    }

    #[test]
    fn test_should_declare_namespaces_of_type_references() {
        let style = TypeInfo::builder()
            .name("Style")
            .namespace("System.Windows")
            .module(framework())
            .build()
            .into_ref();
        let target = PropertyDescriptor::builder()
            .name("TargetType")
            .property_type(builtin::object())
            .value_serializer(Arc::new(TypeNameSerializer {
                target: widgets_type("Gauge"),
            }))
            .build();
        let value = DynamicObject::new(style).with(target, "Gauge").into_value();
        assert_eq!(
            write(&value),
            format!(r#"<Style TargetType="aw:Gauge" xmlns="clr-namespace:System.Windows;assembly=PresentationFramework" xmlns:aw="{WIDGETS}"/>"#)
        );
    }

    #[test]
    fn test_should_fail_on_non_public_descendant() {
        let hidden = TypeInfo::builder()
            .name("InternalControl")
            .namespace("Acme.Widgets")
            .module(ModuleInfo::new("Widgets").into_ref())
            .visibility(TypeVisibility::NonPublic)
            .build()
            .into_ref();
        let panel = stack_panel_of(vec![DynamicObject::new(hidden).into_value()]).into_value();
        let err = to_markup(&panel).unwrap_err();
        assert!(
            matches!(&err, MarkupError::IneligibleType { type_name, .. } if type_name == "Acme.Widgets.InternalControl"),
            "{err}"
        );
    }

    #[test]
    fn test_should_expose_markup_object_properties() {
        let value = button_with("OK").with(grid_row(), 3).into_value();
        let object = markup_object_for(&value).expect("markup object");
        let names: Vec<_> = object
            .properties()
            .iter()
            .map(|p| p.name().to_owned())
            .collect();
        assert_eq!(names, vec!["Content", "Row"]);
        assert!(object.properties()[1].is_attached());
    }
}
