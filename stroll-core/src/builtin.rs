use crate::{Profile, ProfileConfig, ProfileError};

const WEBSITE_USER: &str = include_str!("../profiles/website_user.json");
const MY_USER: &str = include_str!("../profiles/my_user.json");

/// Names accepted by [`builtin`].
pub const BUILTIN_PROFILES: &[&str] = &["website_user", "my_user"];

/// Look up one of the bundled profiles by name.
pub fn builtin(name: &str) -> Result<Profile, ProfileError> {
    let source = match name {
        "website_user" => WEBSITE_USER,
        "my_user" => MY_USER,
        _ => return Err(ProfileError::UnknownProfile(name.to_string())),
    };
    ProfileConfig::from_json(source)?.build()
}

/// Site browsing: home, about, contact, and static assets.
pub fn website_user() -> Result<Profile, ProfileError> {
    builtin("website_user")
}

/// JSON API usage: home page plus reads and writes on `/api/data`.
pub fn my_user() -> Result<Profile, ProfileError> {
    builtin("my_user")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Method, ThinkTime};
    use serde_json::json;

    fn endpoints(profile: &Profile) -> Vec<(String, Method, String)> {
        profile
            .tasks()
            .iter()
            .flat_map(|task| {
                task.requests()
                    .iter()
                    .map(|r| (task.name().to_string(), r.method, r.path.clone()))
            })
            .collect()
    }

    #[test]
    fn all_builtins_load() {
        for name in BUILTIN_PROFILES {
            let profile = builtin(name).unwrap();
            assert_eq!(profile.name(), *name);
            assert_eq!(profile.think_time(), ThinkTime::default());
            assert_eq!(profile.host().as_str(), "http://localhost:3000");
            assert!(profile.tasks().iter().all(|task| task.weight() == 1));
        }
    }

    #[test]
    fn unknown_builtin() {
        assert!(matches!(
            builtin("admin_user"),
            Err(ProfileError::UnknownProfile(_))
        ));
    }

    #[test]
    fn website_user_endpoints() {
        let profile = website_user().unwrap();
        let expected = [
            ("load_homepage", "/"),
            ("load_about_page", "/about"),
            ("load_contact_page", "/contact"),
            ("load_assets", "/static/css/main.css"),
            ("load_assets", "/static/js/main.js"),
        ]
        .map(|(task, path)| (task.to_string(), Method::Get, path.to_string()));
        assert_eq!(endpoints(&profile), expected);
    }

    #[test]
    fn my_user_endpoints() {
        let profile = my_user().unwrap();
        assert_eq!(
            endpoints(&profile),
            [
                ("index".to_string(), Method::Get, "/".to_string()),
                ("get_data".to_string(), Method::Get, "/api/data".to_string()),
                ("post_data".to_string(), Method::Post, "/api/data".to_string()),
            ]
        );

        let post = &profile.task("post_data").unwrap().requests()[0];
        assert_eq!(post.body, Some(json!({ "key": "value" })));

        let index = &profile.task("index").unwrap().requests()[0];
        assert_eq!(
            profile.resolve(index).unwrap().as_str(),
            "http://localhost:3000/"
        );
    }
}
