fn main() {
    kings_planet::run();
}
