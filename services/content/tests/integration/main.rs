mod helpers;

mod page_test;
mod router_test;
mod submission_test;
