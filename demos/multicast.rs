//! Delegate walkthrough
//!
//! Run with: cargo run --example multicast
//!
//! Set `RUST_LOG=delegates_rs=debug` to see registrations as they happen.

use delegates_rs::{Delegate, MultiCast, Receiver};

struct A {
    x: i32,
}

impl A {
    fn foo(&mut self, a: i32) {
        println!("A called! x: {}; param 'a': {}", self.x, a);
    }

    fn foo_no_params(&mut self, _: ()) {
        println!("A called! x: {}", self.x);
    }
}

struct B {
    x: i32,
    o: f32,
}

impl B {
    fn foo(&mut self, _c: i32) {
        println!("foo called (B)! x: {}; o: {}", self.x, self.o);
    }

    fn foo1(&self, c: i32) {
        println!(
            "foo1 called (B)! x: {}; o: {}; param 'c': {}",
            self.x, self.o, c
        );
    }
}

fn sum((a, b): (f32, f32)) -> f32 {
    a + b
}

fn global_func(a: i32) {
    println!("global function called! param: {}", a);
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("delegates_rs=info".parse()?),
        )
        .init();

    println!("\n====== DELEGATE: FREE FUNCTION ======\n");
    let global = Delegate::function(global_func);
    global.invoke(5)?;

    println!("\n====== DELEGATE: RETURN VALUE ======\n");
    let add = Delegate::function(sum);
    let x = add.invoke((3.0, 6.0))?;
    println!("sum is: {}", x);

    println!("\n====== DELEGATE: METHOD ======\n");
    let a = Receiver::new(A { x: 3 });
    let method = Delegate::method(&a, A::foo_no_params);
    method.invoke(())?;

    println!("\n====== MULTICAST DELEGATE ======\n");
    let b = Receiver::new(B { x: 4, o: 5.31 });

    let mut multi = MultiCast::new();
    multi.add(global_func);
    multi.add_method(&a, A::foo);
    multi.add_method(&b, B::foo);
    multi.add_method_ref(&b, B::foo1);

    multi.invoke(8);

    // Any single registration can be taken back out
    multi.remove_method(&a, A::foo);
    println!("\n====== MULTICAST DELEGATE (minus a method) ======\n");
    multi.invoke(53);

    println!(
        "\nregistered: {} ({} functions, {} methods)",
        multi.count(),
        multi.global_count(),
        multi.member_count()
    );

    Ok(())
}
