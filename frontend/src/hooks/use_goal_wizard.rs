use std::cell::RefCell;
use std::rc::Rc;

use goal_wizard::{
    fetch_catalog, CatalogTicket, GoalWizard, GoalsBackend, StepThreeInput, SubmissionOutcome,
    WizardError, WizardView,
};
use shared::{GoalCreationResponse, GoalType, RewardType};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::services::api::ApiClient;
use crate::services::{app_config, session_store};

/// Current wizard view plus the callbacks that drive it
#[derive(Clone)]
pub struct UseGoalWizardHandle {
    pub view: WizardView,
    pub open: Callback<()>,
    pub cancel: Callback<()>,
    pub select_executor: Callback<String>,
    pub select_goal_type: Callback<GoalType>,
    pub next: Callback<()>,
    pub back: Callback<()>,
    pub reward_type_changed: Callback<RewardType>,
    pub select_store_item: Callback<String>,
    pub submit: Callback<StepThreeInput>,
}

#[derive(Clone)]
struct WizardContext {
    wizard: Rc<RefCell<GoalWizard>>,
    view: UseStateHandle<WizardView>,
    api_client: ApiClient,
}

impl WizardContext {
    fn refresh(&self) {
        self.view.set(self.wizard.borrow().view());
    }

    /// Re-render, and leave the page when the session is gone
    fn settle(&self, result: Result<(), WizardError>) {
        if let Err(e) = &result {
            if e.is_fatal() {
                session_store::redirect_to_login();
            }
        }
        self.refresh();
    }

    fn load(&self, ticket: Option<CatalogTicket>) {
        self.refresh();
        let Some(ticket) = ticket else {
            return;
        };

        let ctx = self.clone();
        spawn_local(async move {
            let response = fetch_catalog(&ctx.api_client, ticket).await;
            let result = ctx.wizard.borrow_mut().apply_catalog(response);
            ctx.settle(result.map(|_| ()));
        });
    }

    fn transition(&self, result: Result<Option<CatalogTicket>, WizardError>) {
        match result {
            Ok(ticket) => self.load(ticket),
            Err(e) => self.settle(Err(e)),
        }
    }

    fn submit(&self, input: StepThreeInput, on_created: Callback<GoalCreationResponse>) {
        let pending = {
            let mut wizard = self.wizard.borrow_mut();
            wizard
                .collect_step_three_fields(&input)
                .and_then(|_| wizard.begin_submission())
        };

        let pending = match pending {
            Ok(pending) => pending,
            Err(e) => return self.settle(Err(e)),
        };
        self.refresh();

        let ctx = self.clone();
        spawn_local(async move {
            let result = ctx.api_client.create_goal(&pending.request).await;
            let outcome = ctx.wizard.borrow_mut().finish_submission(pending, result);
            match outcome {
                Ok(SubmissionOutcome::Created(response)) => {
                    ctx.refresh();
                    on_created.emit(response);
                }
                Ok(SubmissionOutcome::Discarded) => ctx.refresh(),
                Err(e) => ctx.settle(Err(e)),
            }
        });
    }
}

/// Hook owning one goal wizard for the lifetime of the component
#[hook]
pub fn use_goal_wizard(
    api_client: ApiClient,
    on_created: Callback<GoalCreationResponse>,
) -> UseGoalWizardHandle {
    let wizard = use_mut_ref(|| GoalWizard::new(app_config::load_wizard()));
    let view = use_state({
        let wizard = wizard.clone();
        move || wizard.borrow().view()
    });

    let ctx = WizardContext {
        wizard,
        view: view.clone(),
        api_client,
    };

    let open = {
        let ctx = ctx.clone();
        Callback::from(move |_: ()| {
            let session = ctx.api_client.session();
            let result = ctx.wizard.borrow_mut().initialize(&session);
            match result {
                Ok(ticket) => ctx.load(Some(ticket)),
                Err(e) => ctx.settle(Err(e)),
            }
        })
    };

    let cancel = {
        let ctx = ctx.clone();
        Callback::from(move |_: ()| {
            ctx.wizard.borrow_mut().cancel();
            ctx.refresh();
        })
    };

    let select_executor = {
        let ctx = ctx.clone();
        Callback::from(move |id: String| {
            let result = ctx.wizard.borrow_mut().select_executor_by_id(&id);
            ctx.settle(result);
        })
    };

    let select_goal_type = {
        let ctx = ctx.clone();
        Callback::from(move |goal_type: GoalType| {
            let result = ctx.wizard.borrow_mut().select_goal_type(goal_type);
            ctx.settle(result);
        })
    };

    let next = {
        let ctx = ctx.clone();
        Callback::from(move |_: ()| {
            let result = ctx.wizard.borrow_mut().advance();
            ctx.transition(result);
        })
    };

    let back = {
        let ctx = ctx.clone();
        Callback::from(move |_: ()| {
            let result = ctx.wizard.borrow_mut().retreat();
            ctx.transition(result);
        })
    };

    let reward_type_changed = {
        let ctx = ctx.clone();
        Callback::from(move |reward_type: RewardType| {
            let result = ctx.wizard.borrow_mut().habit_reward_type_changed(reward_type);
            ctx.transition(result);
        })
    };

    let select_store_item = {
        let ctx = ctx.clone();
        Callback::from(move |item_id: String| {
            let result = ctx.wizard.borrow_mut().select_store_item(&item_id);
            ctx.settle(result);
        })
    };

    let submit = {
        let ctx = ctx.clone();
        Callback::from(move |input: StepThreeInput| {
            ctx.submit(input, on_created.clone());
        })
    };

    UseGoalWizardHandle {
        view: (*view).clone(),
        open,
        cancel,
        select_executor,
        select_goal_type,
        next,
        back,
        reward_type_changed,
        select_store_item,
        submit,
    }
}
