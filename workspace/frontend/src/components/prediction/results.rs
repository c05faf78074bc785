use yew::prelude::*;

use crate::chart::plotly::resize_chart;
use crate::chart::CHART_SURFACE_ID;

#[derive(Properties, PartialEq)]
pub struct PredictionResultsProps {
    pub severity: Option<String>,
    pub visible: bool,
}

/// Severity heading and chart surface. The surface stays mounted while
/// hidden so the chart manager always has an element to draw into.
#[function_component(PredictionResults)]
pub fn prediction_results(props: &PredictionResultsProps) -> Html {
    log::trace!("Rendering results (visible: {})", props.visible);

    // A chart drawn while the card was hidden was laid out at zero width.
    use_effect_with(props.visible, |visible| {
        if *visible {
            resize_chart(CHART_SURFACE_ID);
        }
        || ()
    });

    let card_classes = classes!(
        "card",
        "bg-base-100",
        "shadow",
        "mt-6",
        (!props.visible).then_some("hidden")
    );

    html! {
        <div id="results" class={card_classes}>
            <div class="card-body">
                <div id="severityResult">
                    {if let Some(severity) = &props.severity {
                        html! {
                            <h3 class="card-title">
                                {format!("Predicted COPD Severity: {}", severity)}
                            </h3>
                        }
                    } else {
                        html! {}
                    }}
                </div>
                <div id={CHART_SURFACE_ID} style="width:100%; height:400px;"></div>
            </div>
        </div>
    }
}
