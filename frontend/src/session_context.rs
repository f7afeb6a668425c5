use std::rc::Rc;

use gasdash_shared::session::{LoginResponse, Session};
use web_sys::window;
use yew::prelude::*;

use crate::api::API_BASE;

const SESSION_KEY: &str = "gasdash:session";

fn storage() -> Option<web_sys::Storage> {
    window().and_then(|win| win.local_storage().ok().flatten())
}

/// Read the persisted session once at start-up. A missing or unreadable entry
/// yields an anonymous session.
fn load() -> Session {
    let stored = storage()
        .and_then(|store| store.get_item(SESSION_KEY).ok().flatten())
        .and_then(|raw| serde_json::from_str::<Session>(&raw).ok());
    match stored {
        Some(session) if session.is_authenticated() => Session {
            api_base: API_BASE.trim_end_matches('/').to_string(),
            ..session
        },
        _ => Session::anonymous(API_BASE),
    }
}

fn persist(session: &Session) {
    let Some(store) = storage() else {
        return;
    };
    let result = if session.is_authenticated() {
        match serde_json::to_string(session) {
            Ok(raw) => store.set_item(SESSION_KEY, &raw),
            Err(_) => return,
        }
    } else {
        store.remove_item(SESSION_KEY)
    };
    if result.is_err() {
        web_sys::console::warn_1(&"failed to update stored session".into());
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub session: Session,
}

pub enum SessionAction {
    SignIn(LoginResponse),
    SignOut,
}

impl Reducible for SessionState {
    type Action = SessionAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        match action {
            SessionAction::SignIn(login) => {
                next.session = Session::signed_in(next.session.api_base.clone(), login);
            },
            SessionAction::SignOut => next.session.sign_out(),
        }
        persist(&next.session);
        Rc::new(next)
    }
}

pub type SessionContext = UseReducerHandle<SessionState>;

#[derive(Properties, PartialEq)]
pub struct SessionProviderProps {
    pub children: Html,
}

#[function_component(SessionProvider)]
pub fn session_provider(props: &SessionProviderProps) -> Html {
    let state = use_reducer(|| SessionState {
        session: load(),
    });
    html! {
        <ContextProvider<SessionContext> context={state}>
            {props.children.clone()}
        </ContextProvider<SessionContext>>
    }
}

/// Current session; anonymous outside a provider.
#[hook]
pub fn use_session() -> (Session, Option<SessionContext>) {
    let ctx = use_context::<SessionContext>();
    let session = ctx
        .as_ref()
        .map(|ctx| ctx.session.clone())
        .unwrap_or_else(|| Session::anonymous(API_BASE));
    (session, ctx)
}
