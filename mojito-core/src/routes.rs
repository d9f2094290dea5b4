// File: mojito-core/src/routes.rs

// Path -> view table. The state engine doesn't render pages; it only needs
// to know which view a path mounts so it can start and cancel that view's
// work.

/// Views a path can resolve to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/`: the feed when logged in, the guest landing page otherwise.
    Home,
    Profile { username: String },
    ViewPost { id: String },
    EditPost { id: String },
    CreatePost,
    About,
    Terms,
    NotFound,
}

pub const NOT_FOUND_TITLE: &str = "not Found";
pub const NOT_FOUND_MESSAGE: &str = "whoops, we cannot find that page";

impl Route {
    /// Resolve a path. Entries are tried in declaration order and the first
    /// match wins; entries not marked exact also match deeper paths. Static
    /// segments match without regard to case; parameters keep theirs.
    pub fn resolve(path: &str) -> Route {
        let path = path.split(['?', '#']).next().unwrap_or("");
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let lowered: Vec<String> = segments.iter().map(|s| s.to_ascii_lowercase()).collect();
        let keys: Vec<&str> = lowered.iter().map(String::as_str).collect();

        // Parameters come from `segments`, which has the same shape as `keys`.
        let param = |i: usize| segments[i].to_string();
        match keys.as_slice() {
            ["profile", _, ..] => Route::Profile { username: param(1) },
            [] => Route::Home,
            ["post", _] => Route::ViewPost { id: param(1) },
            ["post", _, "edit"] => Route::EditPost { id: param(1) },
            ["create-post", ..] => Route::CreatePost,
            ["about-us", ..] => Route::About,
            ["terms", ..] => Route::Terms,
            _ => Route::NotFound,
        }
    }

    /// Whether mounting this route loads the home feed.
    pub fn loads_feed(&self, logged_in: bool) -> bool {
        matches!(self, Route::Home) && logged_in
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Home => "Your Feed",
            Route::Profile { .. } => "Profile",
            Route::ViewPost { .. } => "Post",
            Route::EditPost { .. } => "Edit Post",
            Route::CreatePost => "Create New Post",
            Route::About => "About Us",
            Route::Terms => "Terms and Conditions",
            Route::NotFound => NOT_FOUND_TITLE,
        }
    }
}
