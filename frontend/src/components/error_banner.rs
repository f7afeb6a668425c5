use yew::prelude::*;
use yew_hooks::prelude::use_timeout;

#[derive(Clone, Copy, PartialEq, Default)]
pub enum BannerTone {
    #[default]
    Error,
    Success,
}

#[derive(Properties, PartialEq)]
pub struct ErrorBannerProps {
    pub message: String,
    #[prop_or_default]
    pub tone: BannerTone,
    #[prop_or_default]
    pub on_close: Option<Callback<()>>,
    #[prop_or(true)]
    pub auto_dismiss: bool,
}

/// Toast shown above a page after an action. Errors stay until closed
/// unless `auto_dismiss` is set.
#[function_component(ErrorBanner)]
pub fn error_banner(props: &ErrorBannerProps) -> Html {
    let is_open = use_state(|| true);

    let dismiss = {
        let is_open = is_open.clone();
        let on_close = props.on_close.clone();
        Callback::from(move |_| {
            if !*is_open {
                return;
            }
            is_open.set(false);
            if let Some(cb) = on_close.as_ref() {
                cb.emit(());
            }
        })
    };

    let auto_timeout = {
        let dismiss = dismiss.clone();
        use_timeout(move || dismiss.emit(()), if props.auto_dismiss { 4000 } else { 0 })
    };

    {
        let is_open = is_open.clone();
        let auto_timeout = auto_timeout.clone();
        let auto_dismiss = props.auto_dismiss;
        use_effect_with(props.message.clone(), move |_| {
            is_open.set(true);
            if auto_dismiss {
                auto_timeout.reset();
            } else {
                auto_timeout.cancel();
            }
        });
    }

    if props.message.trim().is_empty() || !*is_open {
        return Html::default();
    }

    let (tone_classes, icon, title) = match props.tone {
        BannerTone::Error => ("bg-red-50 text-red-800 border-red-200", "⚠️", "Something went wrong"),
        BannerTone::Success => ("bg-emerald-50 text-emerald-800 border-emerald-200", "✓", "Done"),
    };

    let close_button = {
        let dismiss = dismiss.clone();
        Callback::from(move |_| dismiss.emit(()))
    };

    html! {
        <div
            class={classes!("flex", "items-start", "gap-3", "rounded-2xl", "border", "px-5", "py-4", "text-sm", "shadow-xl", "w-full", "max-w-2xl", tone_classes)}
            role="alert"
            aria-live="assertive"
        >
            <span class="text-2xl" aria-hidden="true">{ icon }</span>
            <div class="flex-1 space-y-1">
                <p class="font-semibold text-base">{ title }</p>
                <p>{ props.message.clone() }</p>
            </div>
            <button
                type="button"
                class={classes!("ml-4", "inline-flex", "h-8", "w-8", "items-center", "justify-center", "rounded-full", "text-lg", "hover:bg-black/10")}
                aria-label="Dismiss"
                onclick={close_button}
            >
                {"×"}
            </button>
        </div>
    }
}
