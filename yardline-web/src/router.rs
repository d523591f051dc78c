use yew_router::prelude::*;

#[derive(Clone, Debug, Routable, PartialEq, Eq)]
pub enum Route {
    #[at("/")]
    Yard,
    #[at("/plan")]
    Plan,
    #[at("/404")]
    #[not_found]
    NotFound,
}

impl Route {
    /// Navigation label for the header.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Yard | Self::NotFound => "Depot Yard",
            Self::Plan => "Induction Plan",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_map_to_paths() {
        assert_eq!(Route::Yard.to_path(), "/");
        assert_eq!(Route::Plan.to_path(), "/plan");
        assert_eq!(Route::recognize("/plan"), Some(Route::Plan));
        assert_eq!(Route::recognize("/bogus"), Some(Route::NotFound));
    }
}
