use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub notices: Vec<String>,
}

/// Most-recent-first feed of yard events.
#[function_component(Notices)]
pub fn notices(p: &Props) -> Html {
    if p.notices.is_empty() {
        return Html::default();
    }
    html! {
        <aside class="notices" aria-live="polite">
            <ul>
                { for p.notices.iter().map(|notice| html! {
                    <li key={notice.clone()}>{ notice.clone() }</li>
                }) }
            </ul>
        </aside>
    }
}
