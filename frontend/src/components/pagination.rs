use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct PaginationProps {
    pub current_page: usize,
    pub total_pages: usize,
    /// Rows in the filtered view, shown as a summary next to the buttons.
    #[prop_or_default]
    pub total_rows: Option<usize>,
    pub on_page_change: Callback<usize>,
}

#[derive(Debug, PartialEq)]
enum PageSlot {
    Page(usize),
    Gap,
}

#[function_component(Pagination)]
pub fn pagination(props: &PaginationProps) -> Html {
    let summary = props
        .total_rows
        .map(|rows| html! { <span class={classes!("text-sm", "text-[var(--muted)]")}>{ format!("{rows} rows") }</span> })
        .unwrap_or_default();
    if props.total_pages <= 1 {
        return summary;
    }

    let total_pages = props.total_pages;
    let current_page = props.current_page.clamp(1, total_pages);
    let go = |page: usize| {
        let on_page_change = props.on_page_change.clone();
        Callback::from(move |_: MouseEvent| on_page_change.emit(page))
    };
    let button = classes!(
        "inline-flex",
        "h-9",
        "min-w-[2.25rem]",
        "items-center",
        "justify-center",
        "rounded-lg",
        "border",
        "border-[var(--border)]",
        "px-2",
        "text-sm",
        "disabled:opacity-50",
        "disabled:cursor-not-allowed"
    );

    html! {
        <nav class={classes!("flex", "flex-wrap", "items-center", "gap-2")} aria-label="Pagination">
            { summary }
            <button
                type="button"
                class={button.clone()}
                disabled={current_page <= 1}
                onclick={go(current_page.saturating_sub(1).max(1))}
                aria-label="Previous page"
            >
                {"‹"}
            </button>
            { for visible_slots(current_page, total_pages).into_iter().enumerate().map(|(index, slot)| match slot {
                PageSlot::Page(page) => html! {
                    <button
                        key={format!("page-{page}")}
                        type="button"
                        class={classes!(button.clone(), (page == current_page).then_some("bg-[var(--primary)] text-white"))}
                        aria-current={(page == current_page).then(|| AttrValue::from("page"))}
                        disabled={page == current_page}
                        onclick={go(page)}
                    >
                        { page }
                    </button>
                },
                PageSlot::Gap => html! {
                    <span key={format!("gap-{index}")} class={classes!("px-1", "opacity-60")} aria-hidden="true">{"…"}</span>
                },
            }) }
            <button
                type="button"
                class={button}
                disabled={current_page >= total_pages}
                onclick={go((current_page + 1).min(total_pages))}
                aria-label="Next page"
            >
                {"›"}
            </button>
        </nav>
    }
}

/// First, last and a window of five around the current page.
fn visible_slots(current: usize, total: usize) -> Vec<PageSlot> {
    if total <= 7 {
        return (1..=total).map(PageSlot::Page).collect();
    }
    let (start, end) = if current <= 3 {
        (2, 5)
    } else if current + 2 >= total {
        (total.saturating_sub(4).max(2), total - 1)
    } else {
        (current - 1, current + 1)
    };

    let mut slots = vec![PageSlot::Page(1)];
    if start > 2 {
        slots.push(PageSlot::Gap);
    }
    slots.extend((start..=end).map(PageSlot::Page));
    if end < total - 1 {
        slots.push(PageSlot::Gap);
    }
    slots.push(PageSlot::Page(total));
    slots
}
