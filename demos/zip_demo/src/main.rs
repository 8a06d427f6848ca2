use std::cell::RefCell;
use std::rc::Rc;

use tether_core::prelude::*;

fn main() {
    env_logger::init();

    let mut graph = WorkGraph::new();
    let compile = graph.add_task(":compileJava");
    let version = graph.add_task(":writeVersion");

    let consumed = Rc::new(RefCell::new(Vec::new()));
    let record = {
        let consumed = consumed.clone();
        SideEffect::new(move |dir: &String| consumed.borrow_mut().push(dir.clone()))
    };
    let classes = providers::fixed("build/classes".to_string());
    let classes = providers::with_side_effect(classes, record);
    let classes = providers::produced_by(compile, classes);
    let tag = providers::fixed("1.4.2".to_string());
    let tag = providers::produced_by(version, tag);

    let jar = classes.zip(&tag, |dir, tag| format!("{dir}/app-{tag}.jar"));
    let build_id = providers::changing(|| std::env::var("BUILD_ID").ok());
    let manifest = jar.zip(&build_id, |jar, id| format!("{jar} (build {id})"));

    for provider in [&jar, &manifest] {
        let execution = provider.calculate_execution_time_value();
        println!("{provider}");
        println!("  producers: {:?}", graph.describe(&provider.producer()));
        println!("  changing:  {}", execution.is_changing_value());
        match provider.get() {
            Ok(value) => println!("  value:     {value}"),
            Err(err) => {
                log::warn!("{err}");
                println!("  value:     <missing>");
            }
        }
    }

    println!("side effects observed: {:?}", consumed.borrow());
}
