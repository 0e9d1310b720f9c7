//! Backend endpoint table.

/// Absolute URLs for every backend endpoint, rooted at one base URL.
#[derive(Debug, Clone)]
pub struct Routes {
    base_url: String,
}

impl Routes {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{endpoint}", self.base_url)
    }

    pub fn auth_login(&self) -> String {
        self.url("/api/auth/login")
    }

    pub fn auth_firebase(&self) -> String {
        self.url("/api/auth/firebase")
    }

    pub fn auth_me(&self) -> String {
        self.url("/api/auth/me")
    }

    pub fn auth_profile(&self) -> String {
        self.url("/api/auth/profile")
    }

    pub fn properties(&self) -> String {
        self.url("/api/properties")
    }

    pub fn property(&self, id: &str) -> String {
        self.url(&format!("/api/properties/{id}"))
    }
}

/// Keep only the parameters that have a value.
pub fn query_pairs<'a, I>(params: I) -> Vec<(String, String)>
where
    I: IntoIterator<Item = (&'a str, Option<String>)>,
{
    params
        .into_iter()
        .filter_map(|(key, value)| value.map(|value| (key.to_string(), value)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn routes() -> Routes {
        Routes::new("http://localhost:5000/")
    }

    #[test]
    fn endpoints_are_rooted_at_base_url() {
        let r = routes();
        assert_eq!(r.auth_login(), "http://localhost:5000/api/auth/login");
        assert_eq!(r.auth_me(), "http://localhost:5000/api/auth/me");
        assert_eq!(r.properties(), "http://localhost:5000/api/properties");
        assert_eq!(r.property("p1"), "http://localhost:5000/api/properties/p1");
        assert_eq!(r.auth_firebase(), "http://localhost:5000/api/auth/firebase");
        assert_eq!(r.auth_profile(), "http://localhost:5000/api/auth/profile");
    }

    #[test]
    fn query_pairs_skips_absent_values() {
        let pairs = query_pairs([
            ("status", Some("vacant".to_string())),
            ("city", None),
            ("bhk", Some("2BHK".to_string())),
        ]);
        assert_eq!(
            pairs,
            vec![
                ("status".to_string(), "vacant".to_string()),
                ("bhk".to_string(), "2BHK".to_string())
            ]
        );
    }
}
