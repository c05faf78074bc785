use common::fields;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct PredictionFormProps {
    pub form_ref: NodeRef,
    pub on_submit: Callback<SubmitEvent>,
    pub submitting: bool,
}

fn number_input(id: &'static str, label: &'static str, step: &'static str, disabled: bool) -> Html {
    html! {
        <div class="form-control">
            <label class="label"><span class="label-text">{label}</span></label>
            <input
                type="number"
                id={id}
                name={id}
                step={step}
                min="0"
                class="input input-bordered w-full"
                required={true}
                disabled={disabled}
            />
        </div>
    }
}

fn flag_input(id: &'static str, label: &'static str, disabled: bool) -> Html {
    html! {
        <label class="label cursor-pointer justify-start gap-2">
            <input
                type="checkbox"
                id={id}
                name={id}
                class="checkbox checkbox-primary"
                disabled={disabled}
            />
            <span class="label-text">{label}</span>
        </label>
    }
}

#[function_component(PredictionForm)]
pub fn prediction_form(props: &PredictionFormProps) -> Html {
    let disabled = props.submitting;

    html! {
        <form
            ref={props.form_ref.clone()}
            id="predictionForm"
            onsubmit={props.on_submit.clone()}
            class="space-y-4"
        >
            <div class="grid grid-cols-2 gap-4">
                {number_input(fields::AGE, "Age", "1", disabled)}
                <div class="form-control">
                    <label class="label"><span class="label-text">{"Gender"}</span></label>
                    <select
                        id={fields::GENDER}
                        name={fields::GENDER}
                        class="select select-bordered w-full"
                        disabled={disabled}
                    >
                        <option value="1">{"Male"}</option>
                        <option value="0">{"Female"}</option>
                    </select>
                </div>
                {number_input(fields::PACK_HISTORY, "Pack history (pack-years)", "1", disabled)}
                {number_input(fields::MWT1_BEST, "6-minute walk distance (m)", "1", disabled)}
            </div>

            <h4 class="font-semibold">{"Lung function"}</h4>
            <div class="grid grid-cols-2 gap-4">
                {number_input(fields::FEV1, "FEV1 (L)", "0.01", disabled)}
                {number_input(fields::FEV1_PRED, "FEV1 % predicted", "1", disabled)}
                {number_input(fields::FVC, "FVC (L)", "0.01", disabled)}
                {number_input(fields::FVC_PRED, "FVC % predicted", "1", disabled)}
            </div>

            <h4 class="font-semibold">{"Questionnaires"}</h4>
            <div class="grid grid-cols-3 gap-4">
                {number_input(fields::CAT, "CAT score", "1", disabled)}
                {number_input(fields::HAD, "HAD score", "1", disabled)}
                {number_input(fields::SGRQ, "SGRQ score", "1", disabled)}
            </div>

            <h4 class="font-semibold">{"Comorbidities"}</h4>
            <div class="grid grid-cols-2 gap-2">
                {flag_input(fields::DIABETES, "Diabetes", disabled)}
                {flag_input(fields::MUSCULAR, "Musculoskeletal disease", disabled)}
                {flag_input(fields::HYPERTENSION, "Hypertension", disabled)}
                {flag_input(fields::ATRIAL_FIB, "Atrial fibrillation", disabled)}
                {flag_input(fields::IHD, "Ischemic heart disease", disabled)}
            </div>

            <button type="submit" class="btn btn-primary" disabled={disabled}>
                {if disabled {
                    html! {
                        <>
                            <span class="loading loading-spinner loading-sm"></span>
                            {" Predicting..."}
                        </>
                    }
                } else {
                    html! { {"Predict severity"} }
                }}
            </button>
        </form>
    }
}
