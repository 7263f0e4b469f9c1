//! Property tests for pagination links and `Allow` headers.

mod common;

use common::{controller_with, items};
use hal_resource::controller::ResponseBody;
use hal_resource::resource::{EventBackend, Operation, Paginator};
use hal_resource::{QueryParams, ResourceRequest};
use http::{Method, StatusCode};
use proptest::prelude::*;
use proptest::sample::subsequence;

const METHODS: [&str; 6] = ["DELETE", "GET", "HEAD", "PATCH", "POST", "PUT"];

fn paginated_backend(total: usize) -> EventBackend {
    EventBackend::new().with_listener(Operation::FetchAll, move |_| {
        let ids: Vec<String> = (0..total).map(|i| format!("item-{}", i)).collect();
        let ids: Vec<&str> = ids.iter().map(String::as_str).collect();
        Ok(Some(Paginator::new(items(&ids)).into()))
    })
}

proptest! {
    #[test]
    fn test_pagination_links_are_consistent(
        total in 0usize..40,
        page_size in 1usize..8,
        requested in 0usize..12,
    ) {
        let controller = controller_with(
            paginated_backend(total),
            common::config().with_page_size(page_size),
        );
        let query = QueryParams::new().with("page", requested.to_string());

        let response = tokio_test::block_on(
            controller.dispatch(ResourceRequest::list().with_query(query)),
        )
        .unwrap();
        prop_assert_eq!(response.status, StatusCode::OK);

        let ResponseBody::Collection(collection) = &response.body else {
            panic!("expected a collection document, got {:?}", response.body);
        };

        let last = total.div_ceil(page_size).max(1);
        let current = requested.clamp(1, last);
        let expected_items = total.saturating_sub((current - 1) * page_size).min(page_size);

        prop_assert_eq!(collection.items.len(), expected_items);
        prop_assert!(collection.links.contains("self"));
        prop_assert!(collection.links.contains("first"));
        prop_assert!(collection.links.contains("last"));
        prop_assert_eq!(collection.links.contains("prev"), current > 1);
        prop_assert_eq!(collection.links.contains("next"), current < last);

        let self_href = collection.links.get("self").unwrap_or_default();
        if current > 1 {
            let suffix = format!("?page={}", current);
            prop_assert!(self_href.ends_with(&suffix));
        } else {
            prop_assert!(!self_href.contains("page="));
        }
    }

    #[test]
    fn test_allow_header_is_sorted_and_unique(
        methods in subsequence(METHODS.to_vec(), 1..=METHODS.len()),
        reversed in any::<bool>(),
    ) {
        let mut configured: Vec<String> = methods.iter().map(|m| m.to_lowercase()).collect();
        if reversed {
            configured.reverse();
        }
        configured.extend(configured.clone());

        let controller = controller_with(
            EventBackend::new(),
            common::config().with_item_http_methods(configured),
        );
        let response = tokio_test::block_on(
            controller.dispatch(ResourceRequest::new(Method::OPTIONS).with_identifier("foo")),
        )
        .unwrap();

        prop_assert_eq!(response.status, StatusCode::NO_CONTENT);
        let expected = methods.join(", ");
        prop_assert_eq!(response.allow_header(), Some(expected.as_str()));
    }
}
