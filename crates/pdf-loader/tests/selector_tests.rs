use pdf_loader::*;

fn pdf_upload(name: &str) -> FileUpload {
    FileUpload::from_path(format!("/home/user/{name}"))
}

#[test]
fn test_submit_url_sets_trimmed_source() {
    let mut selector = SourceSelector::new();
    selector.url_text_mut().push_str("  https://example.com/sample.pdf  ");
    let text = selector.url_text().to_string();

    let change = selector.submit_url(&text).expect("non-empty URL is accepted");

    assert_eq!(
        change.source,
        PdfSource::Url("https://example.com/sample.pdf".to_string())
    );
    assert_eq!(selector.source(), Some(&change.source));
    assert_eq!(selector.uploaded_file_name(), "");
    assert_eq!(selector.page_count(), 0);
    assert_eq!(
        selector.active_label(),
        Some(SourceLabel::Url("https://example.com/sample.pdf"))
    );
}

#[test]
fn test_blank_url_is_ignored() {
    let mut selector = SourceSelector::new();
    assert!(selector.submit_url("").is_none());
    assert!(selector.submit_url("   \t ").is_none());
    assert!(selector.source().is_none());
    assert!(selector.current_token().is_none());

    let change = selector.submit_url("https://example.com/a.pdf").unwrap();
    assert!(selector.submit_url("  ").is_none());
    assert_eq!(selector.source(), Some(&change.source));
    assert_eq!(selector.current_token(), Some(change.token));
}

#[test]
fn test_url_is_not_validated_locally() {
    let mut selector = SourceSelector::new();
    let change = selector.submit_url("not a url").unwrap();
    assert_eq!(change.source.as_url(), Some("not a url"));
}

#[test]
fn test_submit_url_clears_file_and_page_count() {
    let mut selector = SourceSelector::new();
    let token = selector.submit_file(&pdf_upload("paper.pdf")).unwrap();
    selector.complete_file_read(token, vec![1u8, 2, 3]).unwrap();
    selector.set_page_count(12);

    selector.submit_url("https://example.com/b.pdf").unwrap();

    assert_eq!(selector.uploaded_file_name(), "");
    assert_eq!(selector.page_count(), 0);
    assert_eq!(
        selector.active_label(),
        Some(SourceLabel::Url("https://example.com/b.pdf"))
    );
}

#[test]
fn test_non_pdf_file_is_rejected_without_state_change() {
    let mut selector = SourceSelector::new();
    let change = selector.submit_url("https://example.com/a.pdf").unwrap();
    selector.set_page_count(3);

    let result = selector.submit_file(&pdf_upload("notes.txt"));

    match result {
        Err(LoaderError::InvalidFileType(media_type)) => assert_eq!(media_type, "text/plain"),
        other => panic!("Expected InvalidFileType, got {other:?}"),
    }
    assert_eq!(selector.source(), Some(&change.source));
    assert_eq!(selector.uploaded_file_name(), "");
    assert_eq!(selector.page_count(), 3);
    assert_eq!(selector.current_token(), Some(change.token));
    assert!(!selector.is_reading());
}

#[test]
fn test_file_read_completion_sets_bytes_source() {
    let mut selector = SourceSelector::new();
    selector.url_text_mut().push_str("https://example.com/old.pdf");
    selector.submit_url("https://example.com/old.pdf").unwrap();
    selector.set_page_count(7);

    let token = selector.submit_file(&pdf_upload("thesis.pdf")).unwrap();
    assert!(selector.is_reading());

    let change = selector
        .complete_file_read(token, b"%PDF-1.4".to_vec())
        .expect("current read is applied");

    assert_eq!(change.token, token);
    assert_eq!(change.source.as_bytes(), Some(&b"%PDF-1.4"[..]));
    assert_eq!(selector.source(), Some(&change.source));
    assert_eq!(selector.uploaded_file_name(), "thesis.pdf");
    assert_eq!(selector.url_text(), "");
    assert_eq!(selector.page_count(), 0);
    assert!(!selector.is_reading());
    assert_eq!(selector.active_label(), Some(SourceLabel::File("thesis.pdf")));
}

#[test]
fn test_stale_file_read_is_dropped_after_url_submit() {
    let mut selector = SourceSelector::new();
    let read_token = selector.submit_file(&pdf_upload("slow.pdf")).unwrap();
    let url_change = selector.submit_url("https://example.com/new.pdf").unwrap();

    assert!(selector.complete_file_read(read_token, vec![0u8; 16]).is_none());

    assert_eq!(selector.source(), Some(&url_change.source));
    assert_eq!(selector.uploaded_file_name(), "");
}

#[test]
fn test_stale_file_read_is_dropped_after_newer_file() {
    let mut selector = SourceSelector::new();
    let first = selector.submit_file(&pdf_upload("first.pdf")).unwrap();
    let second = selector.submit_file(&pdf_upload("second.pdf")).unwrap();
    assert_ne!(first, second);

    let change = selector.complete_file_read(second, vec![2u8]).unwrap();
    assert!(selector.complete_file_read(first, vec![1u8]).is_none());

    assert_eq!(selector.source(), Some(&change.source));
    assert_eq!(selector.uploaded_file_name(), "second.pdf");
}

#[test]
fn test_failed_read_only_matters_for_current_token() {
    let mut selector = SourceSelector::new();
    let first = selector.submit_file(&pdf_upload("first.pdf")).unwrap();
    let second = selector.submit_file(&pdf_upload("second.pdf")).unwrap();

    assert!(!selector.fail_file_read(first));
    assert!(selector.is_reading());
    assert!(selector.fail_file_read(second));
    assert!(!selector.is_reading());
    assert!(selector.source().is_none());
}

#[test]
fn test_tokens_increase_with_each_submission() {
    let mut selector = SourceSelector::new();
    let a = selector.submit_url("https://example.com/a.pdf").unwrap().token;
    let b = selector.submit_file(&pdf_upload("b.pdf")).unwrap();
    let c = selector.submit_url("https://example.com/c.pdf").unwrap().token;
    assert!(a < b && b < c);
}

#[test]
fn test_default_selector_issues_token_one_first() {
    assert_eq!(RequestToken::default(), RequestToken::NONE);

    let mut selector = SourceSelector::default();
    assert_eq!(selector.current_token(), None);

    let change = selector.submit_url("https://example.com/a.pdf").unwrap();
    assert_eq!(change.token, RequestToken(1));
    assert_eq!(selector.current_token(), Some(RequestToken(1)));
}

#[test]
fn test_active_label_survives_editing_the_url_field() {
    let mut selector = SourceSelector::new();
    selector.submit_url("https://example.com/a.pdf").unwrap();

    selector.url_text_mut().push_str("-draft");
    selector.url_text_mut().clear();

    assert_eq!(
        selector.active_label(),
        Some(SourceLabel::Url("https://example.com/a.pdf"))
    );
}
