use pdf_loader::*;

fn url_change(selector: &mut SourceSelector, url: &str) -> SourceChange {
    selector.submit_url(url).expect("URL accepted")
}

#[test]
fn test_new_viewer_is_idle_with_defaults() {
    let viewer = PdfViewer::default();
    assert_eq!(viewer.state(), &LoadState::Idle);
    assert_eq!(viewer.page_count(), 0);
    assert!(viewer.pages().is_empty());
    assert_eq!(viewer.options().width, 800.0);
    assert_eq!(viewer.options().scale, 1.5);
}

#[test]
fn test_set_source_enters_loading() {
    let mut selector = SourceSelector::new();
    let mut viewer = PdfViewer::default();
    let change = url_change(&mut selector, "https://example.com/a.pdf");

    let request = viewer.set_source(change.clone());

    assert_eq!(request.token, change.token);
    assert_eq!(request.source, change.source);
    assert_eq!(viewer.state(), &LoadState::Loading);
    assert_eq!(viewer.source(), Some(&change.source));
}

#[test]
fn test_success_mounts_every_page_in_order() {
    let mut selector = SourceSelector::new();
    let mut viewer = PdfViewer::new(ViewerOptions::default().with_scale(2.0));
    let change = url_change(&mut selector, "https://example.com/a.pdf");
    let token = change.token;
    viewer.set_source(change);

    let event = viewer.handle_load_success(token, 5).expect("event for current load");

    let ViewerEvent::LoadSucceeded { page_count, render } = event else {
        panic!("Expected LoadSucceeded");
    };
    assert_eq!(page_count, 5);
    assert_eq!(render.token, token);
    assert_eq!(render.page_numbers, vec![1, 2, 3, 4, 5]);
    assert_eq!(render.options.scale, 2.0);
    assert!(!render.options.render_annotations);
    assert!(!render.options.render_form_data);

    assert_eq!(viewer.state(), &LoadState::Loaded { page_count: 5 });
    let numbers: Vec<u16> = viewer.pages().iter().map(|p| p.page_number).collect();
    assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
    assert!(viewer.pages().iter().all(|p| p.scale == 2.0));
    assert!(viewer.pages().iter().all(|p| p.status == PageStatus::Pending));
}

#[test]
fn test_failure_reports_once_and_shows_no_pages() {
    let mut selector = SourceSelector::new();
    let mut viewer = PdfViewer::default();
    let change = url_change(&mut selector, "https://example.com/broken.pdf");
    let token = change.token;
    viewer.set_source(change);

    let events: Vec<_> = [
        viewer.handle_load_error(token, "Invalid PDF structure"),
        viewer.handle_load_error(token, "Invalid PDF structure"),
        viewer.handle_load_success(token, 3),
    ]
    .into_iter()
    .flatten()
    .collect();

    assert_eq!(
        events,
        vec![ViewerEvent::LoadFailed {
            error: "Invalid PDF structure".to_string()
        }]
    );
    assert!(matches!(viewer.state(), LoadState::Failed { .. }));
    assert!(viewer.pages().is_empty());
    assert_eq!(viewer.page_count(), 0);
}

#[test]
fn test_new_source_while_loading_reflects_only_latest() {
    let mut selector = SourceSelector::new();
    let mut viewer = PdfViewer::default();

    let first = url_change(&mut selector, "https://example.com/first.pdf");
    let first_token = first.token;
    viewer.set_source(first);

    let second = url_change(&mut selector, "https://example.com/second.pdf");
    let second_token = second.token;
    viewer.set_source(second);
    assert_eq!(viewer.page_count(), 0);
    assert_eq!(selector.page_count(), 0);

    // The first document finishes late and must not be shown
    assert!(viewer.handle_load_success(first_token, 40).is_none());
    assert_eq!(viewer.state(), &LoadState::Loading);

    let event = viewer.handle_load_success(second_token, 2).unwrap();
    if let ViewerEvent::LoadSucceeded { page_count, .. } = event {
        selector.set_page_count(page_count);
    }
    assert_eq!(viewer.page_count(), 2);
    assert_eq!(selector.page_count(), 2);
}

#[test]
fn test_source_change_after_load_resets_pages() {
    let mut selector = SourceSelector::new();
    let mut viewer = PdfViewer::default();
    let change = url_change(&mut selector, "https://example.com/a.pdf");
    let token = change.token;
    viewer.set_source(change);
    viewer.handle_load_success(token, 3).unwrap();

    viewer.set_source(url_change(&mut selector, "https://example.com/b.pdf"));

    assert_eq!(viewer.state(), &LoadState::Loading);
    assert_eq!(viewer.page_count(), 0);
    assert!(viewer.pages().is_empty());
}

#[test]
fn test_page_results_resolve_placeholders() {
    let mut selector = SourceSelector::new();
    let mut viewer = PdfViewer::default();
    let change = url_change(&mut selector, "https://example.com/a.pdf");
    let token = change.token;
    viewer.set_source(change);
    viewer.handle_load_success(token, 3).unwrap();

    assert!(viewer.handle_page_rendered(token, 1, 918, 1188));
    assert!(viewer.handle_page_failed(token, 2, "bad content stream"));
    assert!(!viewer.handle_page_rendered(token, 9, 10, 10));
    assert!(!viewer.handle_page_rendered(RequestToken(999), 3, 10, 10));

    let statuses: Vec<&PageStatus> = viewer.pages().iter().map(|p| &p.status).collect();
    assert_eq!(
        statuses,
        vec![
            &PageStatus::Rendered {
                width: 918,
                height: 1188
            },
            &PageStatus::Failed {
                error: "bad content stream".to_string()
            },
            &PageStatus::Pending,
        ]
    );
    assert_eq!(viewer.rendered_pages(), 1);
}

#[test]
fn test_stale_page_results_after_source_change_are_ignored() {
    let mut selector = SourceSelector::new();
    let mut viewer = PdfViewer::default();
    let change = url_change(&mut selector, "https://example.com/a.pdf");
    let old = change.token;
    viewer.set_source(change);
    viewer.handle_load_success(old, 2).unwrap();

    let change = url_change(&mut selector, "https://example.com/b.pdf");
    let new = change.token;
    viewer.set_source(change);
    viewer.handle_load_success(new, 2).unwrap();

    assert!(!viewer.handle_page_rendered(old, 1, 100, 100));
    assert_eq!(viewer.pages()[0].status, PageStatus::Pending);
}

#[test]
fn test_clear_returns_to_idle() {
    let mut selector = SourceSelector::new();
    let mut viewer = PdfViewer::default();
    let change = url_change(&mut selector, "https://example.com/a.pdf");
    let token = change.token;
    viewer.set_source(change);
    viewer.clear();

    assert_eq!(viewer.state(), &LoadState::Idle);
    assert!(viewer.source().is_none());
    assert!(viewer.handle_load_success(token, 1).is_none());
}

#[test]
fn test_oversized_page_count_is_capped_at_last_addressable_page() {
    let mut selector = SourceSelector::new();
    let mut viewer = PdfViewer::default();
    let change = url_change(&mut selector, "https://example.com/huge.pdf");
    let token = change.token;
    viewer.set_source(change);

    let event = viewer
        .handle_load_success(token, usize::from(u16::MAX) + 10)
        .expect("event for current load");

    let ViewerEvent::LoadSucceeded { page_count, render } = event else {
        panic!("Expected LoadSucceeded");
    };
    assert_eq!(page_count, usize::from(u16::MAX));
    assert_eq!(viewer.pages().len(), usize::from(u16::MAX));
    assert_eq!(render.page_numbers.last(), Some(&u16::MAX));
}
