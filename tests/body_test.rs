use mail_flatten::*;
use std::sync::Arc;

fn plain(text: &str) -> PartNode {
    PartNode::text("text/plain", text)
}

fn extract_recorded(node: &PartNode, config: &ParserConfig) -> (String, Vec<Fault>) {
    let diagnostics = RecordingDiagnostics::new();
    let text = BodyExtractor::new(config, &diagnostics).extract(node);
    (text, diagnostics.faults())
}

// --- Transport decoding ---

#[test]
fn test_round_trip_decode() {
    for text in ["Hello world", "", "ünïcödé ✓", "line one\r\nline two", "a?b>c~"] {
        assert_eq!(decode_body(&encode_body(text.as_bytes())), text);
    }
}

#[test]
fn test_garbage_base64_is_empty() {
    assert_eq!(decode_body("!!!not-base64!!!"), "");
    assert_eq!(
        try_decode("!!!not-base64!!!", false).unwrap_err().kind(),
        "decode"
    );
}

// --- Leaves ---

#[test]
fn test_empty_node() {
    assert_eq!(extract(&PartNode::empty()), "");
}

#[test]
fn test_plain_leaf() {
    assert_eq!(extract(&plain("Hello world")), "Hello world");
}

#[test]
fn test_leaf_without_body() {
    assert_eq!(extract(&PartNode::leaf("text/plain", None)), "");
    assert_eq!(extract(&PartNode::leaf("text/plain", Some(String::new()))), "");
}

#[test]
fn test_unknown_mime_type_dropped() {
    let node = PartNode::text("application/pdf", "%PDF-1.4");
    assert_eq!(extract(&node), "");
}

#[test]
fn test_garbage_leaf_reports_fault() {
    let node = PartNode::leaf("text/plain", Some("!!!not-base64!!!".into()));
    let (text, faults) = extract_recorded(&node, &ParserConfig::default());

    assert_eq!(text, "");
    assert_eq!(faults.len(), 1);
    assert_eq!(faults[0].kind(), "decode");
}

#[test]
fn test_invalid_utf8_leaf() {
    let node = PartNode::leaf("text/plain", Some(encode_body(b"bad \xff\xfe bytes")));

    let (text, faults) = extract_recorded(&node, &ParserConfig::default());
    assert_eq!(text, "");
    assert_eq!(faults[0].kind(), "invalid_utf8");

    let lossy = ParserConfig {
        lossy_utf8: true,
        ..ParserConfig::default()
    };
    let (text, faults) = extract_recorded(&node, &lossy);
    assert!(text.starts_with("bad "));
    assert!(text.contains('\u{fffd}'));
    assert!(faults.is_empty());
}

// --- HTML ---

#[test]
fn test_html_leaf_is_converted() {
    let node = PartNode::text(
        "text/html",
        "<html><body><h1>Hello</h1><p>World</p></body></html>",
    );
    let text = extract(&node);

    assert!(text.contains("Hello"));
    assert!(text.contains("World"));
    assert!(!text.contains("<p>"));
}

#[test]
fn test_html_keeps_link_targets_inline() {
    let node = PartNode::text(
        "text/html",
        r#"<p>Read the <a href="https://example.com/post">full post</a> today</p>"#,
    );
    let text = extract(&node);

    assert!(text.contains("[full post](https://example.com/post) today"));
    assert!(!text.contains("[1]"));
    assert_eq!(analyze(&text).url_count, 1);
}

#[test]
fn test_html_keeps_image_source_and_emphasis() {
    let text = html_to_text(
        r#"<p>Read <a href="https://example.com/post">the post</a>. <img src="https://cdn.example.com/logo.png" alt="Logo"> <em>very</em> <strong>bold</strong></p>"#,
        0,
    )
    .unwrap();

    assert!(text.contains("[the post](https://example.com/post)"));
    assert!(text.contains("![Logo](https://cdn.example.com/logo.png)"));
    assert!(text.contains("*very*"));
    assert!(text.contains("**bold**"));
    assert_eq!(analyze(&text).url_count, 2);
}

#[test]
fn test_html_long_link_is_not_wrapped_by_default() {
    let url = format!("https://example.com/{}", "segment/".repeat(20));
    let node = PartNode::text("text/html", &format!(r#"<a href="{url}">x</a>"#));
    let text = extract(&node);

    assert_eq!(text, format!("[x]({url})"));
    assert_eq!(extract_urls(&text), vec![format!("{url})")]);
}

#[test]
fn test_html_wraps_at_configured_width() {
    let html = format!("<p>{}</p>", "word ".repeat(40));

    let wrapped = html_to_text(&html, 40).unwrap();
    assert!(wrapped.lines().count() > 1);
    assert!(wrapped.lines().all(|line| line.chars().count() <= 40));

    let unwrapped = html_to_text(&html, 0).unwrap();
    assert_eq!(unwrapped.lines().count(), 1);
}

// --- Containers ---

#[test]
fn test_join_skips_empty_children() {
    let node = PartNode::container(
        "multipart/mixed",
        vec![plain("A"), PartNode::empty(), plain("B")],
    );
    assert_eq!(extract(&node), "A\n\nB");
}

#[test]
fn test_empty_container() {
    let node = PartNode::container("multipart/mixed", vec![]);
    assert_eq!(extract(&node), "");
}

#[test]
fn test_tree_order_is_preserved() {
    let node = PartNode::container(
        "multipart/mixed",
        vec![
            PartNode::container(
                "multipart/alternative",
                vec![plain("first"), PartNode::text("text/html", "<p>second</p>")],
            ),
            PartNode::text("image/png", "not text"),
            plain("third"),
        ],
    );

    assert_eq!(extract(&node), "first\n\nsecond\n\nthird");
}

#[test]
fn test_nested_empty_container_adds_no_separator() {
    let node = PartNode::container(
        "multipart/mixed",
        vec![
            plain("A"),
            PartNode::container("multipart/related", vec![PartNode::empty()]),
            plain("B"),
        ],
    );
    assert_eq!(extract(&node), "A\n\nB");
}

#[test]
fn test_bad_sibling_does_not_affect_others() {
    let node = PartNode::container(
        "multipart/mixed",
        vec![
            plain("kept"),
            PartNode::leaf("text/plain", Some("%%%".into())),
            plain("also kept"),
        ],
    );
    let (text, faults) = extract_recorded(&node, &ParserConfig::default());

    assert_eq!(text, "kept\n\nalso kept");
    assert_eq!(faults.len(), 1);
}

fn nest(depth: usize, leaf: PartNode) -> PartNode {
    (0..depth).fold(leaf, |node, _| {
        PartNode::container("multipart/mixed", vec![node])
    })
}

#[test]
fn test_deep_nesting_is_traversed() {
    let node = nest(30, plain("deep"));
    let (text, faults) = extract_recorded(&node, &ParserConfig::default());

    assert_eq!(text, "deep");
    assert!(faults.is_empty());
}

#[test]
fn test_depth_limit_fails_closed() {
    let node = PartNode::container(
        "multipart/mixed",
        vec![plain("shallow"), nest(150, plain("too deep"))],
    );
    let (text, faults) = extract_recorded(&node, &ParserConfig::default());

    assert_eq!(text, "shallow");
    assert_eq!(faults, vec![Fault::DepthExceeded { limit: 100 }]);
}

#[test]
fn test_depth_limit_is_configurable() {
    let config = ParserConfig {
        max_depth: 2,
        ..ParserConfig::default()
    };

    assert_eq!(extract_recorded(&nest(2, plain("ok")), &config).0, "ok");
    assert_eq!(extract_recorded(&nest(3, plain("cut")), &config).0, "");
}

#[test]
fn test_assembler_routes_faults_to_injected_sink() {
    let recorder = Arc::new(RecordingDiagnostics::new());
    let assembler = MessageAssembler::new().with_diagnostics(recorder.clone());

    let message = RawMessage::new("m", "t")
        .with_payload(PartNode::leaf("text/plain", Some("***".into())));
    let record = assembler.assemble(&message);

    assert_eq!(record.body, "");
    assert_eq!(recorder.len(), 1);
    assert_eq!(recorder.reports()[0].message_id.as_deref(), Some("m"));
}

#[test]
fn test_standalone_extractor_reports_without_message() {
    let diagnostics = RecordingDiagnostics::new();
    let config = ParserConfig::default();
    let node = PartNode::leaf("text/plain", Some("%%%".into()));

    let _ = BodyExtractor::new(&config, &diagnostics).extract(&node);
    let _ = BodyExtractor::new(&config, &diagnostics)
        .for_message("msg-9")
        .extract(&node);

    let reports = diagnostics.reports();
    assert_eq!(reports[0].message_id, None);
    assert_eq!(reports[1].message_id.as_deref(), Some("msg-9"));
}
