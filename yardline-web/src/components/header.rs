use yew::prelude::*;
use yew_router::prelude::*;

use crate::router::Route;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub backend_live: bool,
}

#[function_component(Header)]
pub fn header(p: &Props) -> Html {
    let source = if p.backend_live {
        ("source-live", "live backend")
    } else {
        ("source-embedded", "bundled dataset")
    };
    html! {
        <header role="banner">
            <div class="header-content">
                <span class="header-title">{ "Yardline" }</span>
                <nav aria-label="Pages" class="header-nav">
                    <Link<Route> to={Route::Yard}>{ Route::Yard.label() }</Link<Route>>
                    <Link<Route> to={Route::Plan}>{ Route::Plan.label() }</Link<Route>>
                </nav>
                <span class={classes!("header-source", source.0)}>{ source.1 }</span>
            </div>
        </header>
    }
}
