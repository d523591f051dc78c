use yew::prelude::*;

use crate::format::tier_class;
use yardline_sim::StatusRecord;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub status: Vec<StatusRecord>,
}

fn row(record: &StatusRecord) -> Html {
    html! {
        <tr key={record.train_id.to_string()}>
            <td>{ record.train_id.to_string() }</td>
            <td class={tier_class(record.fitness_status)}>
                { record.fitness_status.to_string() }
            </td>
            <td>{ record.days_until_next_service }</td>
            <td>{ record.next_service_due_date.to_string() }</td>
            <td>{ record.fitness_validity.map_or_else(|| "-".to_string(), |d| d.to_string()) }</td>
            <td>{ record.job_card_status.clone() }</td>
            <td>{ record.yard_position.clone() }</td>
            <td>{ record.consequence_if_skipped.clone() }</td>
        </tr>
    }
}

/// Backend status, one row per train.
#[function_component(StatusTable)]
pub fn status_table(p: &Props) -> Html {
    html! {
        <table class="status-table">
            <thead>
                <tr>
                    <th>{ "Train" }</th>
                    <th>{ "Fitness" }</th>
                    <th>{ "Days to service" }</th>
                    <th>{ "Next service due" }</th>
                    <th>{ "Validity" }</th>
                    <th>{ "Job card" }</th>
                    <th>{ "Yard position" }</th>
                    <th>{ "If skipped" }</th>
                </tr>
            </thead>
            <tbody>
                { for p.status.iter().map(row) }
            </tbody>
        </table>
    }
}
