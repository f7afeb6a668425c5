use web_sys::{HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};
use yew::prelude::*;

#[derive(Clone, PartialEq, Default)]
pub enum FieldKind {
    #[default]
    Text,
    Number,
    Date,
    TextArea,
    Checkbox,
    /// Fixed choices as (value, label).
    Select(Vec<(&'static str, String)>),
}

#[derive(Properties, PartialEq)]
pub struct FormFieldProps {
    /// Draft field name passed back through `on_input`.
    pub name: &'static str,
    pub label: AttrValue,
    pub value: String,
    #[prop_or_default]
    pub kind: FieldKind,
    #[prop_or_default]
    pub error: Option<String>,
    #[prop_or(false)]
    pub required: bool,
    #[prop_or(false)]
    pub disabled: bool,
    pub on_input: Callback<(&'static str, String)>,
}

/// Labelled input bound to one draft field, with its validation message.
#[function_component(FormField)]
pub fn form_field(props: &FormFieldProps) -> Html {
    let name = props.name;
    let emit = {
        let on_input = props.on_input.clone();
        move |value: String| on_input.emit((name, value))
    };
    let input_classes = classes!("input", "w-full", props.error.is_some().then_some("border-red-500"));
    let id = format!("field-{name}");

    let control = match &props.kind {
        FieldKind::TextArea => {
            let oninput = Callback::from(move |event: InputEvent| {
                if let Some(target) = event.target_dyn_into::<HtmlTextAreaElement>() {
                    emit(target.value());
                }
            });
            html! {
                <textarea id={id.clone()} class={input_classes} rows="4" value={props.value.clone()} {oninput} disabled={props.disabled} />
            }
        },
        FieldKind::Checkbox => {
            let onchange = Callback::from(move |event: Event| {
                if let Some(target) = event.target_dyn_into::<HtmlInputElement>() {
                    emit(if target.checked() { "true" } else { "false" }.to_string());
                }
            });
            html! {
                <input id={id.clone()} type="checkbox" checked={props.value == "true"} {onchange} disabled={props.disabled} />
            }
        },
        FieldKind::Select(options) => {
            let onchange = Callback::from(move |event: Event| {
                if let Some(target) = event.target_dyn_into::<HtmlSelectElement>() {
                    emit(target.value());
                }
            });
            html! {
                <select id={id.clone()} class={input_classes} {onchange} disabled={props.disabled}>
                    { for options.iter().map(|(value, label)| html! {
                        <option value={*value} selected={props.value == *value}>{ label.clone() }</option>
                    }) }
                </select>
            }
        },
        kind => {
            let input_type = match kind {
                FieldKind::Number => "number",
                FieldKind::Date => "date",
                _ => "text",
            };
            let oninput = Callback::from(move |event: InputEvent| {
                if let Some(target) = event.target_dyn_into::<HtmlInputElement>() {
                    emit(target.value());
                }
            });
            html! {
                <input
                    id={id.clone()}
                    type={input_type}
                    step={(input_type == "number").then_some("any")}
                    class={input_classes}
                    value={props.value.clone()}
                    {oninput}
                    disabled={props.disabled}
                />
            }
        },
    };

    html! {
        <div class={classes!("flex", "flex-col", "gap-1")}>
            <label for={id} class={classes!("text-sm", "font-medium")}>
                { props.label.clone() }
                if props.required {
                    <span class={classes!("ml-0.5", "text-red-600")}>{ "*" }</span>
                }
            </label>
            { control }
            if let Some(error) = props.error.clone() {
                <p class={classes!("text-xs", "text-red-600")} role="alert">{ error }</p>
            }
        </div>
    }
}
