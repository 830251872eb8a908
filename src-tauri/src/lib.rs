pub mod backend;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod models;
pub mod repositories;
pub mod state;
pub mod validation;

#[cfg(feature = "app")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    use commands::{
        auth::{auth_state, current_user, sign_in, sign_in_with_credential, sign_out, sign_up},
        booking::{
            add_booking_images, enter_booking, pick_booking_images, remove_booking_image,
            submission_state, submit_repair_request,
        },
        catalog::{get_service_center, get_technician, list_service_centers, list_technicians},
        dashboard::load_dashboard,
        history::{cancel_repair_request, get_repair_request, list_repair_requests},
        launch::get_launch_route,
        profile::{load_profile, profile_state, save_profile, select_profile_image},
        reviews::{submit_review, technician_reviews},
        settings::{complete_onboarding, get_settings, open_support_chat, save_settings},
    };
    use context::AppContext;
    use std::sync::Arc;
    use tauri::Manager;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .plugin(tauri_plugin_dialog::init())
        .setup(|app| {
            let data_dir = app.path().app_data_dir()?;
            let ctx = Arc::new(tauri::async_runtime::block_on(AppContext::open(&data_dir))?);
            commands::events::spawn_state_forwarders(app.handle(), &ctx);
            app.manage(ctx);
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            sign_in,
            sign_up,
            sign_in_with_credential,
            sign_out,
            current_user,
            auth_state,
            enter_booking,
            add_booking_images,
            pick_booking_images,
            remove_booking_image,
            submit_repair_request,
            submission_state,
            list_service_centers,
            get_service_center,
            list_technicians,
            get_technician,
            load_dashboard,
            list_repair_requests,
            get_repair_request,
            cancel_repair_request,
            get_launch_route,
            load_profile,
            select_profile_image,
            save_profile,
            profile_state,
            submit_review,
            technician_reviews,
            get_settings,
            save_settings,
            complete_onboarding,
            open_support_chat,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
