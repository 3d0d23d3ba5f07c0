
mod avatar_test;
mod recent_work_test;
mod router_test;
mod webhook_test;
