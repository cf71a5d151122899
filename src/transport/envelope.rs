use std::fmt::Write as _;

use quick_xml::Reader;
use quick_xml::escape::escape;
use quick_xml::events::Event;

/// Fault reported by the gateway inside a SOAP response body.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SoapFault {
    pub code: Option<String>,
    pub reason: Option<String>,
}

/// Wrap an operation element into a SOAP 1.1 envelope.
///
/// Parameter values are embedded as escaped text: the OMS gateway expects
/// request documents (`xmsUser`, `xmsData`) to arrive as XML-escaped strings
/// inside the operation parameters.
pub fn build_envelope(schema: &str, operation: &str, params: &[(&str, String)]) -> String {
    let mut xml = String::with_capacity(256);
    xml.push_str(r#"<?xml version="1.0" encoding="utf-8"?>"#);
    xml.push_str(
        r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/"><soap:Body>"#,
    );
    let _ = write!(xml, r#"<{operation} xmlns="{}">"#, escape(schema));
    for (name, value) in params {
        let _ = write!(xml, "<{name}>{}</{name}>", escape(value));
    }
    let _ = write!(xml, "</{operation}>");
    xml.push_str("</soap:Body></soap:Envelope>");
    xml
}

/// `SOAPAction` header value for an operation under `schema`.
pub fn soap_action(schema: &str, operation: &str) -> String {
    format!("{}/{operation}", schema.trim_end_matches('/'))
}

/// Extract the fault carried by a response envelope, if any.
///
/// Matches on local names so both `<soap:Fault>` and unprefixed `<Fault>`
/// are recognized; `faultcode`/`faultstring` are unqualified in SOAP 1.1.
pub fn extract_fault(xml: &str) -> Option<SoapFault> {
    let mut reader = Reader::from_str(xml);
    let mut fault: Option<SoapFault> = None;
    let mut field: Option<FaultField> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) => {
                let local = start.local_name();
                if fault.is_none() && local.as_ref() == b"Fault" {
                    fault = Some(SoapFault::default());
                } else if fault.is_some() {
                    field = match local.as_ref() {
                        b"faultcode" => Some(FaultField::Code),
                        b"faultstring" => Some(FaultField::Reason),
                        _ => None,
                    };
                }
            }
            Ok(Event::End(end)) => match end.local_name().as_ref() {
                b"Fault" => break,
                b"faultcode" | b"faultstring" => field = None,
                _ => {}
            },
            Ok(Event::Text(text)) => {
                if let (Some(fault), Some(field)) = (fault.as_mut(), field) {
                    let value = text.unescape().ok()?.into_owned();
                    match field {
                        FaultField::Code => fault.code = Some(value),
                        FaultField::Reason => fault.reason = Some(value),
                    }
                }
            }
            Ok(Event::Eof) | Err(_) => break,
            Ok(_) => {}
        }
    }

    fault
}

#[derive(Debug, Clone, Copy)]
enum FaultField {
    Code,
    Reason,
}

/// Pull the text content of the first result field matching one of `names`.
///
/// The gateway returns operation results as XML-escaped documents inside the
/// result element, so the unescaped text content is itself an XML string.
/// Returns `None` when no result field is present.
pub fn extract_result(xml: &str, names: &[&str]) -> Option<String> {
    let mut reader = Reader::from_str(xml);
    let mut depth = 0usize;
    let mut inside = false;
    let mut value = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) => {
                if inside {
                    depth += 1;
                } else if names
                    .iter()
                    .any(|name| name.as_bytes() == start.local_name().as_ref())
                {
                    inside = true;
                }
            }
            Ok(Event::End(_)) if inside => {
                if depth == 0 {
                    return Some(value);
                }
                depth -= 1;
            }
            Ok(Event::Text(text)) if inside => {
                value.push_str(&text.unescape().ok()?);
            }
            Ok(Event::CData(cdata)) if inside => {
                value.push_str(&String::from_utf8_lossy(&cdata.into_inner()));
            }
            Ok(Event::Eof) | Err(_) => return None,
            Ok(_) => {}
        }
    }
}
