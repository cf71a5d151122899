use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::domain::FlatResponse;

/// Decode a nested XML document into a [`FlatResponse`].
///
/// A stack of currently-open element names keys every recorded value: text
/// content lands at the stack path joined by `.`, attributes at the path plus
/// the attribute name as an extra segment. Repeated paths collapse into
/// ordered sequences.
///
/// Decoding is purely structural and never fails: a malformed document yields
/// whatever mapping accumulated before the parse stopped.
pub fn decode_flat_xml(xml: &str) -> FlatResponse {
    let mut reader = Reader::from_str(xml.trim());
    let mut path: Vec<String> = Vec::new();
    let mut flat = FlatResponse::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) => {
                path.push(element_name(&start));
                record_attributes(&mut flat, &path, &start);
            }
            Ok(Event::Empty(start)) => {
                // Self-closing element: opens and closes within one event, so
                // only its attributes can produce entries.
                path.push(element_name(&start));
                record_attributes(&mut flat, &path, &start);
                path.pop();
            }
            Ok(Event::End(_)) => {
                path.pop();
            }
            Ok(Event::Text(text)) => {
                if !path.is_empty() {
                    match text.unescape() {
                        Ok(value) => flat.push(path.join("."), value.into_owned()),
                        Err(_) => break,
                    }
                }
            }
            Ok(Event::CData(cdata)) => {
                if !path.is_empty() {
                    let value = String::from_utf8_lossy(&cdata.into_inner()).into_owned();
                    flat.push(path.join("."), value);
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(_) => break,
        }
    }

    flat
}

fn element_name(start: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(start.name().as_ref()).into_owned()
}

fn record_attributes(flat: &mut FlatResponse, path: &[String], start: &BytesStart<'_>) {
    for attribute in start.attributes().flatten() {
        let Ok(value) = attribute.unescape_value() else {
            continue;
        };
        let name = String::from_utf8_lossy(attribute.key.as_ref());
        flat.push(format!("{}.{name}", path.join(".")), value.into_owned());
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::FlatValue;

    use super::*;

    #[test]
    fn nested_elements_map_to_dotted_paths() {
        let flat = decode_flat_xml(
            "<serviceInfo><supportedService><SMS_SENDER>\
             <maxDbcsPerMessage>70</maxDbcsPerMessage>\
             </SMS_SENDER></supportedService></serviceInfo>",
        );

        assert_eq!(
            flat.text("serviceInfo.supportedService.SMS_SENDER.maxDbcsPerMessage"),
            Some("70")
        );
    }

    #[test]
    fn attributes_land_at_path_plus_attribute_name() {
        let flat = decode_flat_xml(r#"<xmsBody format="SMS"><content contentId="Att0.txt">hi</content></xmsBody>"#);

        assert_eq!(flat.text("xmsBody.format"), Some("SMS"));
        assert_eq!(flat.text("xmsBody.content.contentId"), Some("Att0.txt"));
        assert_eq!(flat.text("xmsBody.content"), Some("hi"));
    }

    #[test]
    fn attributes_on_self_closing_elements_are_recorded() {
        let flat = decode_flat_xml(r#"<a><b id="7"/></a>"#);
        assert_eq!(flat.text("a.b.id"), Some("7"));
        assert_eq!(flat.text("a.b"), None);
    }

    #[test]
    fn repeated_siblings_collapse_to_ordered_sequences() {
        let flat = decode_flat_xml(
            "<to><recipient>111</recipient><recipient>222</recipient><recipient>333</recipient></to>",
        );

        assert_eq!(
            flat.get("to.recipient"),
            Some(&FlatValue::List(vec![
                "111".to_owned(),
                "222".to_owned(),
                "333".to_owned()
            ]))
        );
    }

    #[test]
    fn same_name_at_different_depths_does_not_collide() {
        let flat = decode_flat_xml("<a><name>outer</name><b><name>inner</name></b></a>");

        assert_eq!(flat.text("a.name"), Some("outer"));
        assert_eq!(flat.text("a.b.name"), Some("inner"));
    }

    #[test]
    fn entity_references_are_unescaped() {
        let flat = decode_flat_xml("<msg>a &lt;b&gt; &amp; c</msg>");
        assert_eq!(flat.text("msg"), Some("a <b> & c"));
    }

    #[test]
    fn cdata_content_is_recorded_verbatim() {
        let flat = decode_flat_xml("<msg><![CDATA[<raw> & text]]></msg>");
        assert_eq!(flat.text("msg"), Some("<raw> & text"));
    }

    #[test]
    fn elements_without_text_produce_no_entry() {
        let flat = decode_flat_xml("<a><b></b></a>");
        assert!(flat.is_empty());
    }

    #[test]
    fn malformed_documents_degrade_to_the_prefix_mapping() {
        let flat = decode_flat_xml("<a><b>one</b><c>two</c><unclosed>");
        assert_eq!(flat.text("a.b"), Some("one"));
        assert_eq!(flat.text("a.c"), Some("two"));

        assert!(decode_flat_xml("not xml at all").is_empty());
    }

    #[test]
    fn reserialized_mapping_round_trips() {
        let mut expected = FlatResponse::new();
        expected.push("root.user", "alice");
        expected.push("root.role", "admin");
        expected.push("root.role", "ops");

        let xml = "<root><user>alice</user><role>admin</role><role>ops</role></root>";
        assert_eq!(decode_flat_xml(xml), expected);
    }
}
