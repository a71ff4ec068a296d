mod checklist_lifecycle;
mod helpers;
mod migrations;
mod run_flow;
