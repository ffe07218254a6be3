use datalinkui::{
    DataLinkConfig, DocumentFormat, DocumentShape, LinkDocument, OutputOptions,
    parse_link_document_str, serialize_document,
};

const DOCUMENT: &str = r#"{
  "dataLinks": [
    {"field": "traceId", "url": "${__value.raw}", "datasourceUid": "tempo"},
    {"field": "msg", "url": "http://example.com/${__value.raw}", "urlDisplayLabel": "Open"}
  ],
  "datasources": [
    {"uid": "tempo", "name": "Tempo", "type": "tempo", "tracing": true}
  ]
}"#;

#[test]
fn edited_links_keep_the_catalogue_when_written_back() {
    let document = parse_link_document_str(DOCUMENT, DocumentFormat::Json).unwrap();
    assert_eq!(document.data_links.len(), 2);
    assert!(document.suggestions.is_empty());

    let edited: Vec<DataLinkConfig> = document
        .data_links
        .iter()
        .map(|link| link.with_datasource_uid(None))
        .collect();
    let document = document.with_data_links(edited);
    let payload =
        serialize_document(&document, &OutputOptions::default().with_pretty(false)).unwrap();

    assert!(payload.contains("\"datasources\""));
    assert!(!payload.contains("datasourceUid"));
    assert!(!payload.contains("\"suggestions\""));

    let reread: LinkDocument = serde_json::from_str(&payload).unwrap();
    assert!(reread.data_links.iter().all(|link| !link.is_internal()));
    assert_eq!(reread.data_links[1].url_display_label_text(), "Open");
}

#[test]
fn empty_uids_read_as_external_links() {
    let document =
        parse_link_document_str(r#"[{"field": "msg", "datasourceUid": ""}]"#, DocumentFormat::Json)
            .unwrap();
    assert_eq!(document.data_links[0].datasource_uid(), None);
    assert!(!document.data_links[0].is_internal());
}

#[test]
fn bare_lists_are_written_back_as_lists() {
    let document =
        parse_link_document_str(r#"[{"field": "msg"}]"#, DocumentFormat::Json).unwrap();
    assert_eq!(document.shape, DocumentShape::List);

    let edited = document.with_data_links(vec![
        DataLinkConfig::new("msg").with_url("http://example.com/${__value.raw}"),
    ]);
    let payload =
        serialize_document(&edited, &OutputOptions::default().with_pretty(false)).unwrap();
    assert_eq!(
        payload,
        r#"[{"field":"msg","url":"http://example.com/${__value.raw}"}]"#
    );

    let reread = parse_link_document_str(&payload, DocumentFormat::Json).unwrap();
    assert_eq!(reread, edited);
}

#[test]
fn objects_stay_objects_even_without_context() {
    let document =
        parse_link_document_str(r#"{"dataLinks": [{"field": "msg"}]}"#, DocumentFormat::Json)
            .unwrap();
    assert_eq!(document.shape, DocumentShape::Document);
    let payload =
        serialize_document(&document, &OutputOptions::default().with_pretty(false)).unwrap();
    assert_eq!(payload, r#"{"dataLinks":[{"field":"msg"}]}"#);
}
