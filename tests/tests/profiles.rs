mod utils;
#[allow(unused)]
use utils::*;

#[cfg(feature = "integration")]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use stroll::prelude::*;

    const USERS: usize = 4;

    #[tokio::test(flavor = "multi_thread")]
    #[ntest::timeout(30_000)]
    async fn website_user_hits_only_its_pages() {
        let (addr, hits) = init().await;

        let stats = Run::new(against(builtin("website_user").unwrap(), addr))
            .users(USERS)
            .duration(Duration::from_secs(3))
            .seed(1)
            .await;

        assert!(dbg!(stats.total()) > 100);
        assert_eq!(stats.error, 0);
        for task in [
            "load_homepage",
            "load_about_page",
            "load_contact_page",
            "load_assets",
        ] {
            assert!(stats.task_count(task).unwrap() > 0, "{task}");
        }

        let seen = hits.snapshot();
        for route in seen.keys() {
            assert!(
                [
                    "GET /",
                    "GET /about",
                    "GET /contact",
                    "GET /static/css/main.css",
                    "GET /static/js/main.js",
                ]
                .contains(&route.as_str()),
                "unexpected request {route}"
            );
        }

        // Users aborted mid-task may have reached the server without being counted.
        assert!(hits.total() >= stats.total());
        assert!(hits.total() <= stats.total() + USERS as u64);

        let css = hits.get("GET /static/css/main.css");
        let js = hits.get("GET /static/js/main.js");
        assert!(css.abs_diff(js) <= USERS as u64);
    }

    #[tokio::test(flavor = "multi_thread")]
    #[ntest::timeout(30_000)]
    async fn my_user_reads_and_writes() {
        let (addr, hits) = init().await;

        let stats = Run::new(against(builtin("my_user").unwrap(), addr))
            .users(USERS)
            .duration(Duration::from_secs(3))
            .await;

        assert_eq!(stats.error, 0);
        assert!(stats.task_count("post_data").unwrap() > 0);
        assert!(hits.get("POST /api/data") >= stats.task_count("post_data").unwrap());
        assert!(hits.get("GET /api/data") >= stats.task_count("get_data").unwrap());
        assert!(hits.get("GET /") >= stats.task_count("index").unwrap());
        assert_eq!(
            hits.snapshot().len(),
            3,
            "unexpected routes: {:?}",
            hits.snapshot()
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    #[ntest::timeout(30_000)]
    async fn error_statuses_are_recorded() {
        let (addr, hits) = init().await;

        let profile = Profile::builder("broken")
            .register("missing", 1, [Request::get("/missing")])
            .unwrap()
            .register(
                "bad_post",
                1,
                [Request::post("/api/data", json!({ "nope": true }))],
            )
            .unwrap()
            .build()
            .unwrap();

        let stats = Run::new(against(profile, addr))
            .users(2)
            .duration(Duration::from_secs(1))
            .await;

        assert!(stats.error > 0);
        assert_eq!(stats.success, 0);
        assert!(hits.get("GET /missing") > 0);
    }

    #[tokio::test(flavor = "multi_thread")]
    #[ntest::timeout(30_000)]
    async fn unreachable_host() {
        let _ = init().await;

        let profile = against(builtin("my_user").unwrap(), "127.0.0.1:1".parse().unwrap());
        let stats = Run::new(profile)
            .users(2)
            .duration(Duration::from_secs(1))
            .await;

        assert_eq!(stats.success, 0);
        assert!(stats.error > 0);
    }
}
