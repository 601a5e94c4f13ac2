mod harvester_tests;
mod support;
