use goal_wizard::{StepThreeInput, WizardView};
use shared::{
    ExecutorOption, ExecutorType, GoalCreationResponse, GoalType, GoalTypeOption, RewardType,
    StoreItem,
};
use wasm_bindgen::JsCast;
use web_sys::{HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement, MouseEvent};
use yew::prelude::*;

use crate::hooks::use_goal_wizard::use_goal_wizard;
use crate::services::api::ApiClient;

#[derive(Properties, PartialEq)]
pub struct GoalWizardModalProps {
    pub is_open: bool,
    pub api_client: ApiClient,
    pub on_close: Callback<()>,
    pub on_created: Callback<GoalCreationResponse>,
}

/// Current value of whatever form control fired the event
fn field_value(event: &Event) -> String {
    let Some(target) = event.target() else {
        return String::new();
    };
    if let Some(input) = target.dyn_ref::<HtmlInputElement>() {
        input.value()
    } else if let Some(select) = target.dyn_ref::<HtmlSelectElement>() {
        select.value()
    } else if let Some(area) = target.dyn_ref::<HtmlTextAreaElement>() {
        area.value()
    } else {
        String::new()
    }
}

fn update_form(
    form: &UseStateHandle<StepThreeInput>,
    apply: fn(&mut StepThreeInput, String),
) -> Callback<Event> {
    let form = form.clone();
    Callback::from(move |e: Event| {
        let mut next = (*form).clone();
        apply(&mut next, field_value(&e));
        form.set(next);
    })
}

#[function_component(GoalWizardModal)]
pub fn goal_wizard_modal(props: &GoalWizardModalProps) -> Html {
    let on_created = {
        let on_created = props.on_created.clone();
        let on_close = props.on_close.clone();
        Callback::from(move |response: GoalCreationResponse| {
            on_created.emit(response);
            on_close.emit(());
        })
    };
    let wizard = use_goal_wizard(props.api_client.clone(), on_created);
    let form = use_state(StepThreeInput::default);

    // Start over every time the modal is opened
    use_effect_with(props.is_open, {
        let open = wizard.open.clone();
        let form = form.clone();
        move |is_open| {
            if *is_open {
                form.set(StepThreeInput::default());
                open.emit(());
            }
        }
    });

    let on_cancel = {
        let cancel = wizard.cancel.clone();
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| {
            cancel.emit(());
            on_close.emit(());
        })
    };

    let on_back = {
        let back = wizard.back.clone();
        Callback::from(move |_: MouseEvent| back.emit(()))
    };

    let on_next = {
        let next = wizard.next.clone();
        Callback::from(move |_: MouseEvent| next.emit(()))
    };

    let on_submit = {
        let submit = wizard.submit.clone();
        let form = form.clone();
        Callback::from(move |_: MouseEvent| submit.emit((*form).clone()))
    };

    if !props.is_open {
        return html! {};
    }

    let view = &wizard.view;
    let body = match view.step {
        1 => render_executors(view, &wizard.select_executor),
        2 => render_goal_types(view, &wizard.select_goal_type),
        _ => render_configuration(
            view,
            &form,
            &wizard.reward_type_changed,
            &wizard.select_store_item,
        ),
    };

    html! {
        <div class="goal-wizard-backdrop">
            <div class="goal-wizard-modal">
                <div class="goal-wizard-header">
                    <h2 class="goal-wizard-title">{"New goal"}</h2>
                    <div class="goal-wizard-steps">
                        {for (1..=3u8).map(|n| html! {
                            <span class={classes!("step-dot", (n <= view.step).then_some("active"))}>{n.to_string()}</span>
                        })}
                    </div>
                    <div class="goal-wizard-progress">
                        <div class="goal-wizard-progress-bar" style={format!("width: {}%", view.progress_percent)}></div>
                    </div>
                    <h3 class="goal-wizard-step-title">{view.step_title}</h3>
                </div>

                {if let Some(error) = &view.last_error {
                    html! { <div class="goal-wizard-error">{error.clone()}</div> }
                } else {
                    html! {}
                }}

                <div class="goal-wizard-body">
                    {body}
                </div>

                <div class="goal-wizard-actions">
                    <button class="wizard-button wizard-button-secondary" onclick={on_cancel}>
                        {"Cancel"}
                    </button>
                    {if view.step > 1 {
                        html! {
                            <button class="wizard-button wizard-button-secondary" onclick={on_back} disabled={!view.can_retreat}>
                                {"Back"}
                            </button>
                        }
                    } else {
                        html! {}
                    }}
                    {if view.show_submit {
                        html! {
                            <button class="wizard-button wizard-button-primary" onclick={on_submit} disabled={view.submitting}>
                                {if view.submitting { "Creating..." } else { "Create goal" }}
                            </button>
                        }
                    } else {
                        html! {
                            <button class="wizard-button wizard-button-primary" onclick={on_next} disabled={!view.can_advance}>
                                {"Next"}
                            </button>
                        }
                    }}
                </div>
            </div>
        </div>
    }
}

fn loading() -> Html {
    html! {
        <div class="goal-wizard-loading">
            <div class="spinner"></div>
            <p>{"Loading..."}</p>
        </div>
    }
}

fn render_executors(view: &WizardView, on_select: &Callback<String>) -> Html {
    if view.loading {
        return loading();
    }

    html! {
        <div class="executor-options">
            {for view.executors.iter().map(|executor| render_executor(executor, view, on_select))}
        </div>
    }
}

fn render_executor(
    executor: &ExecutorOption,
    view: &WizardView,
    on_select: &Callback<String>,
) -> Html {
    let selected = view.selected_executor_id.as_deref() == Some(executor.id.as_str());
    let onclick = {
        let on_select = on_select.clone();
        let id = executor.id.clone();
        Callback::from(move |_: MouseEvent| on_select.emit(id.clone()))
    };

    let badge = match executor.executor_type {
        ExecutorType::Individual => html! {
            <div class="executor-avatar">{executor.avatar.clone().unwrap_or_default()}</div>
        },
        ExecutorType::Group => html! {
            <div class="executor-icon"><i class={executor.icon.clone().unwrap_or_else(|| "fas fa-users".to_string())}></i></div>
        },
    };

    html! {
        <div class={classes!("executor-option", selected.then_some("selected"))} {onclick}>
            {badge}
            <div class="executor-info">
                <h4>{executor.name.clone()}</h4>
                <p>{executor.description.clone()}</p>
            </div>
        </div>
    }
}

fn render_goal_types(view: &WizardView, on_select: &Callback<GoalType>) -> Html {
    if view.loading {
        return loading();
    }

    html! {
        <div class="goal-type-options">
            {for view.goal_types.iter().map(|option| render_goal_type(option, view, on_select))}
        </div>
    }
}

fn render_goal_type(
    option: &GoalTypeOption,
    view: &WizardView,
    on_select: &Callback<GoalType>,
) -> Html {
    let selected = view.selected_goal_type == Some(option.goal_type);
    let onclick = {
        let on_select = on_select.clone();
        let goal_type = option.goal_type;
        Callback::from(move |_: MouseEvent| on_select.emit(goal_type))
    };
    let icon = if option.icon.is_empty() {
        option.goal_type.icon().to_string()
    } else {
        option.icon.clone()
    };

    html! {
        <div class={classes!("goal-type-option", selected.then_some("selected"))} {onclick}>
            <i class={classes!("fas", icon)}></i>
            <h4>{option.name.clone()}</h4>
            <p>{option.description.clone()}</p>
        </div>
    }
}

fn render_configuration(
    view: &WizardView,
    form: &UseStateHandle<StepThreeInput>,
    on_reward_type: &Callback<RewardType>,
    on_store_item: &Callback<String>,
) -> Html {
    let specific = match view.selected_goal_type {
        Some(GoalType::CoinSaving) => html! {
            <div class="form-group">
                <label class="form-label">{"Coins to save"}</label>
                <input type="number" min="1" class="form-input"
                    value={form.coin_target.clone().unwrap_or_default()}
                    onchange={update_form(form, |f, v| f.coin_target = Some(v))} />
            </div>
        },
        Some(GoalType::StoreItem) => render_store_items(view, on_store_item),
        Some(GoalType::HabitBuilding) => render_habit(view, form, on_reward_type),
        Some(GoalType::Mixed) => html! {
            <p class="form-help">{"Mixed goals cannot be configured here. Create several simple goals instead."}</p>
        },
        None => html! {},
    };

    let title = form.title.clone().unwrap_or_else(|| view.title.clone());

    html! {
        <div class="goal-configuration">
            {specific}
            <div class="form-group">
                <label class="form-label">{"Title"}</label>
                <input type="text" class="form-input" placeholder="Name the goal"
                    value={title}
                    onchange={update_form(form, |f, v| f.title = Some(v))} />
            </div>
            <div class="form-group">
                <label class="form-label">{"Description"}</label>
                <textarea class="form-input"
                    value={form.description.clone().unwrap_or_default()}
                    onchange={update_form(form, |f, v| f.description = Some(v))} />
            </div>
            <div class="form-group">
                <label class="form-label">{"Deadline"}</label>
                <input type="date" class="form-input"
                    value={form.deadline.clone().unwrap_or_default()}
                    onchange={update_form(form, |f, v| f.deadline = Some(v))} />
            </div>
            <div class="form-group">
                <label class="form-label">{"Reward (coins)"}</label>
                <input type="number" min="0" class="form-input" placeholder="50"
                    value={form.reward_coins.clone().unwrap_or_default()}
                    onchange={update_form(form, |f, v| f.reward_coins = Some(v))} />
            </div>
        </div>
    }
}

fn store_items_unavailable() -> Html {
    html! {
        <p class="form-help">{"Store items could not be loaded. Go back and open this step again to retry."}</p>
    }
}

fn render_store_items(view: &WizardView, on_select: &Callback<String>) -> Html {
    if view.loading {
        return loading();
    }
    if !view.store_items_loaded {
        return store_items_unavailable();
    }

    html! {
        <div class="store-items-grid">
            {for view.store_items.iter().map(|item| render_store_item(item, view, on_select))}
        </div>
    }
}

fn render_store_item(item: &StoreItem, view: &WizardView, on_select: &Callback<String>) -> Html {
    let selected = view.selected_store_item_id.as_deref() == Some(item.id.as_str());
    let onclick = {
        let on_select = on_select.clone();
        let id = item.id.clone();
        Callback::from(move |_: MouseEvent| on_select.emit(id.clone()))
    };

    html! {
        <div class={classes!("store-item", selected.then_some("selected"))} {onclick}>
            {if let Some(url) = &item.image_url {
                html! { <img src={url.clone()} alt={item.title.clone()} /> }
            } else {
                html! { <i class="fas fa-gift"></i> }
            }}
            <h4>{item.title.clone()}</h4>
            <p class="store-item-cost">{format!("{} coins", item.cost)}</p>
        </div>
    }
}

fn render_habit(
    view: &WizardView,
    form: &UseStateHandle<StepThreeInput>,
    on_reward_type: &Callback<RewardType>,
) -> Html {
    let reward_is_item = form.reward_type.as_deref() == Some("store_item");

    let on_reward_change = {
        let form = form.clone();
        let on_reward_type = on_reward_type.clone();
        Callback::from(move |e: Event| {
            let value = field_value(&e);
            if let Ok(reward_type) = value.parse::<RewardType>() {
                on_reward_type.emit(reward_type);
            }
            let mut next = (*form).clone();
            next.reward_type = Some(value);
            form.set(next);
        })
    };

    let on_streak_change = {
        let form = form.clone();
        Callback::from(move |e: Event| {
            let checked = e
                .target()
                .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
                .map(|input| input.checked())
                .unwrap_or(false);
            let mut next = (*form).clone();
            next.streak_required = checked;
            form.set(next);
        })
    };

    let reward = if reward_is_item {
        if view.loading {
            loading()
        } else if !view.store_items_loaded {
            store_items_unavailable()
        } else if view.store_items.is_empty() {
            html! { <p class="form-help">{"The family store has no items yet."}</p> }
        } else {
            html! {
                <select class="form-input" onchange={update_form(form, |f, v| f.reward_item_id = Some(v))}>
                    <option value="">{"Choose an item"}</option>
                    {for view.store_items.iter().map(|item| html! {
                        <option value={item.id.clone()} selected={form.reward_item_id.as_deref() == Some(item.id.as_str())}>
                            {format!("{} ({} coins)", item.title, item.cost)}
                        </option>
                    })}
                </select>
            }
        }
    } else {
        html! {
            <input type="number" min="1" class="form-input" placeholder="Coins per completed period"
                value={form.reward_value.clone().unwrap_or_default()}
                onchange={update_form(form, |f, v| f.reward_value = Some(v))} />
        }
    };

    html! {
        <div class="habit-configuration">
            <div class="form-group">
                <label class="form-label">{"Number of actions"}</label>
                <input type="number" min="1" class="form-input"
                    value={form.actions.clone().unwrap_or_default()}
                    onchange={update_form(form, |f, v| f.actions = Some(v))} />
            </div>
            <div class="form-group form-row">
                <label class="form-label">{"Within"}</label>
                <input type="number" min="1" class="form-input"
                    value={form.period_value.clone().unwrap_or_default()}
                    onchange={update_form(form, |f, v| f.period_value = Some(v))} />
                <select class="form-input" onchange={update_form(form, |f, v| f.period_type = Some(v))}>
                    <option value="">{"Period"}</option>
                    <option value="day" selected={form.period_type.as_deref() == Some("day")}>{"days"}</option>
                    <option value="week" selected={form.period_type.as_deref() == Some("week")}>{"weeks"}</option>
                    <option value="month" selected={form.period_type.as_deref() == Some("month")}>{"months"}</option>
                </select>
            </div>
            <div class="form-group">
                <label class="form-label">{"Reward"}</label>
                <select class="form-input" onchange={on_reward_change}>
                    <option value="">{"Choose a reward"}</option>
                    <option value="coins" selected={form.reward_type.as_deref() == Some("coins")}>{"Coins"}</option>
                    <option value="store_item" selected={reward_is_item}>{"Store item"}</option>
                </select>
                {reward}
            </div>
            <label class="form-checkbox">
                <input type="checkbox" checked={form.streak_required} onchange={on_streak_change} />
                {"Actions must be done without a break"}
            </label>
        </div>
    }
}
